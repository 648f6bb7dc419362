//! Native plot windows for waveforms, spectra and spectrograms.
//!
//! Each `plot_*` call opens one window and blocks until it is closed.
//! The point and image preparation is kept separate so it can be tested
//! without a display.

use eframe::egui;
use egui::plot::{Legend, Line, Plot, PlotImage, PlotPoint, PlotPoints};
use egui::{Color32, ColorImage, TextureHandle, TextureOptions};
use log::info;
use ndarray::{s, Array2};

use crate::config::DEFAULT_DYNAMIC_RANGE_DB;
use crate::error::RenderError;
use crate::loader::AudioSignal;
use crate::spectrogram::SpectrogramResult;
use crate::spectrum::SpectrumResult;

/// Most points a waveform line is drawn with.
pub const MAX_WAVEFORM_POINTS: usize = 50_000;

const INFERNO: [(f32, [u8; 3]); 5] = [
    (0.0, [0, 0, 4]),
    (0.25, [87, 16, 110]),
    (0.5, [188, 55, 84]),
    (0.75, [249, 142, 9]),
    (1.0, [252, 255, 164]),
];

/// Time/amplitude pairs for `signal`.
///
/// Longer signals are reduced to the minimum and maximum of each bucket
/// so peaks survive the decimation.
pub fn waveform_points(signal: &AudioSignal, max_points: usize) -> Vec<[f64; 2]> {
    let samples = signal.samples();
    let rate = signal.sample_rate() as f64;
    let time = |i: usize| i as f64 / rate;

    if samples.len() <= max_points || max_points < 2 {
        return samples
            .iter()
            .enumerate()
            .map(|(i, &s)| [time(i), s as f64])
            .collect();
    }

    let bucket = (samples.len() + max_points / 2 - 1) / (max_points / 2);
    let mut points = Vec::with_capacity(max_points);
    for (b, chunk) in samples.chunks(bucket).enumerate() {
        let offset = b * bucket;
        let (mut lo, mut hi) = (0, 0);
        for (i, &s) in chunk.iter().enumerate() {
            if s < chunk[lo] {
                lo = i;
            }
            if s > chunk[hi] {
                hi = i;
            }
        }
        let (first, second) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        points.push([time(offset + first), chunk[first] as f64]);
        points.push([time(offset + second), chunk[second] as f64]);
    }
    points
}

/// Frequency/amplitude pairs of the one-sided spectrum.
pub fn spectrum_points(spectrum: &SpectrumResult) -> Vec<[f64; 2]> {
    spectrum
        .frequencies()
        .iter()
        .zip(spectrum.amplitudes())
        .map(|(&f, a)| [f as f64, a as f64])
        .collect()
}

/// Inferno-like colour for `t` in `[0, 1]`.
pub fn colormap(t: f32) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    for pair in INFERNO.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
            return Color32::from_rgb(mix(c0[0], c1[0]), mix(c0[1], c1[1]), mix(c0[2], c1[2]));
        }
    }
    let [r, g, b] = INFERNO[INFERNO.len() - 1].1;
    Color32::from_rgb(r, g, b)
}

/// Largest texture edge the spectrogram image is built with. Devices with a
/// smaller limit get a smaller image.
pub const MAX_TEXTURE_SIDE: usize = 8192;

/// Shrinks `power` to at most `max_rows` x `max_cols` cells, each keeping
/// the loudest value of the cells it covers.
pub fn pool_max(power: &Array2<f32>, max_rows: usize, max_cols: usize) -> Array2<f32> {
    let (rows, cols) = power.dim();
    let out_rows = rows.min(max_rows.max(1));
    let out_cols = cols.min(max_cols.max(1));
    if (out_rows, out_cols) == (rows, cols) {
        return power.clone();
    }
    Array2::from_shape_fn((out_rows, out_cols), |(r, c)| {
        let (r0, r1) = (r * rows / out_rows, (r + 1) * rows / out_rows);
        let (c0, c1) = (c * cols / out_cols, (c + 1) * cols / out_cols);
        power
            .slice(s![r0..r1, c0..c1])
            .fold(0.0_f32, |m, &v| m.max(v))
    })
}

/// Colours the spectrogram in decibels relative to its loudest cell,
/// clamped to `dynamic_range_db` below it. Row 0 is the highest frequency.
///
/// Neither image side exceeds `max_side`; longer recordings are max-pooled
/// so narrow ridges stay visible.
pub fn spectrogram_image(
    spectrogram: &SpectrogramResult,
    dynamic_range_db: f32,
    max_side: usize,
) -> ColorImage {
    let power = pool_max(spectrogram.power(), max_side, max_side);
    let (rows, cols) = power.dim();
    let max = power.iter().cloned().fold(0.0_f32, f32::max);
    let range = dynamic_range_db.max(f32::EPSILON);

    let mut image = ColorImage::new([cols, rows], colormap(0.0));
    if max <= 0.0 {
        return image;
    }
    for y in 0..rows {
        let row = rows - 1 - y;
        for x in 0..cols {
            let p = power[[row, x]];
            let db = if p > 0.0 { 10.0 * (p / max).log10() } else { -range };
            let t = (db.max(-range) + range) / range;
            image.pixels[y * cols + x] = colormap(t);
        }
    }
    image
}

/// Centre and size of the spectrogram image in plot coordinates.
pub fn spectrogram_extent(spectrogram: &SpectrogramResult) -> (PlotPoint, egui::Vec2) {
    let span = |axis: &[f32]| match (axis.first(), axis.last()) {
        (Some(&a), Some(&b)) if b > a => (a, b),
        // a single frame is centred on its segment
        (Some(&a), _) if a > 0.0 => (0.0, 2.0 * a),
        _ => (0.0, 1.0),
    };
    let (t0, t1) = span(spectrogram.times());
    let (f0, f1) = span(spectrogram.frequencies());
    let center = PlotPoint::new((t0 + t1) as f64 / 2.0, (f0 + f1) as f64 / 2.0);
    (center, egui::vec2(t1 - t0, f1 - f0))
}

fn show<A: eframe::App + 'static>(title: &str, app: A) -> Result<(), RenderError> {
    info!("showing \"{}\"", title);
    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(800.0, 600.0)),
        ..Default::default()
    };
    eframe::run_native(title, options, Box::new(move |_cc| Box::new(app)))
        .map_err(|e| RenderError::Window(e.to_string()))
}

/// Title on top, y-axis name above the plot and x-axis name below it.
fn labelled(
    ctx: &egui::Context,
    title: &str,
    x_label: &str,
    y_label: &str,
    add_plot: impl FnOnce(&mut egui::Ui),
) {
    egui::TopBottomPanel::bottom("x_axis_label").show(ctx, |ui| {
        ui.vertical_centered(|ui| ui.label(x_label));
    });
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading(title);
        ui.label(y_label);
        add_plot(ui);
    });
}

pub fn plot_waveform(signal: &AudioSignal, title: &str) -> Result<(), RenderError> {
    let app = LinePlotApp {
        title: title.to_owned(),
        points: waveform_points(signal, MAX_WAVEFORM_POINTS),
        x_label: "Time (s)",
        y_label: "Amplitude",
        x_range: None,
    };
    show(title, app)
}

pub fn plot_spectrum(
    spectrum: &SpectrumResult,
    sample_rate: u32,
    title: &str,
) -> Result<(), RenderError> {
    let app = LinePlotApp {
        title: title.to_owned(),
        points: spectrum_points(spectrum),
        x_label: "Frequency (Hz)",
        y_label: "Amplitude",
        x_range: Some((0.0, sample_rate as f64 / 2.0)),
    };
    show(title, app)
}

pub fn plot_spectrogram(spectrogram: &SpectrogramResult, title: &str) -> Result<(), RenderError> {
    plot_spectrogram_with(spectrogram, title, DEFAULT_DYNAMIC_RANGE_DB)
}

pub fn plot_spectrogram_with(
    spectrogram: &SpectrogramResult,
    title: &str,
    dynamic_range_db: f32,
) -> Result<(), RenderError> {
    let (center, size) = spectrogram_extent(spectrogram);
    let app = HeatmapApp {
        title: title.to_owned(),
        spectrogram: spectrogram.clone(),
        dynamic_range_db,
        texture: None,
        center,
        size,
    };
    show(title, app)
}

struct LinePlotApp {
    title: String,
    points: Vec<[f64; 2]>,
    x_label: &'static str,
    y_label: &'static str,
    x_range: Option<(f64, f64)>,
}

impl eframe::App for LinePlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        labelled(ctx, &self.title, self.x_label, self.y_label, |ui| {
            let mut plot = Plot::new("line").legend(Legend::default());
            if let Some((lo, hi)) = self.x_range {
                plot = plot.include_x(lo).include_x(hi);
            }
            plot.show(ui, |plot_ui| {
                plot_ui.line(Line::new(PlotPoints::new(self.points.clone())));
            });
        });
    }
}

struct HeatmapApp {
    title: String,
    spectrogram: SpectrogramResult,
    dynamic_range_db: f32,
    texture: Option<TextureHandle>,
    center: PlotPoint,
    size: egui::Vec2,
}

impl eframe::App for HeatmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.texture.is_none() {
            let max_side = ctx.input(|i| i.max_texture_side).min(MAX_TEXTURE_SIDE);
            let image = spectrogram_image(&self.spectrogram, self.dynamic_range_db, max_side);
            // linear filtering gives the smooth shading between cells
            self.texture = Some(ctx.load_texture("spectrogram", image, TextureOptions::LINEAR));
        }
        labelled(ctx, &self.title, "Time (s)", "Frequency (Hz)", |ui| {
            Plot::new("spectrogram").show(ui, |plot_ui| {
                if let Some(texture) = &self.texture {
                    plot_ui.image(PlotImage::new(texture.id(), self.center, self.size));
                }
            });
        });
    }
}
