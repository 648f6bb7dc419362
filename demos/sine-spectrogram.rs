use spectra::*;
use std::f32::consts::PI;

// cargo run -r --example sine-spectrogram
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let rate = 22050;
    // two seconds sweeping from 200 Hz to 4 kHz
    let samples = (0..2 * rate)
        .map(|n| {
            let t = n as f32 / rate as f32;
            (2.0 * PI * (200.0 * t + 950.0 * t * t)).sin()
        })
        .collect();
    let signal = AudioSignal::new(samples, rate as u32)?;
    let config = SpectrogramConfig::with_segment(512);
    let result = spectrogram_with(&signal, &config)?;
    plot_spectrogram(&result, "Chirp Spectrogram")?;
    Ok(())
}
