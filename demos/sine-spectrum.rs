use spectra::*;
use std::f32::consts::PI;

// cargo run -r --example sine-spectrum
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let rate = 44100;
    let samples = (0..rate)
        .map(|n| (2.0 * PI * 440.0 * n as f32 / rate as f32).sin())
        .collect();
    let signal = AudioSignal::new(samples, rate as u32)?;
    plot_waveform(&signal, "440 Hz Sine Waveform")?;
    let spectrum = transform(&signal)?;
    plot_spectrum(&spectrum, signal.sample_rate(), "440 Hz Sine Fourier Transform")?;
    Ok(())
}
