//! End-to-end checks through the public API: encode and decode with hound,
//! analyse, and render into PNG files.

use audiogram::dsp::{magnitude_spectrum, spectrogram, AnalysisOptions, ScaleMode, SpectrogramSettings};
use audiogram::pcm::{encode_pcm16, HEADER_LEN};
use audiogram::render::{
    draw_frequency_graph, draw_position_marker, draw_spectrogram, draw_waveform,
    FrequencyGraphOptions, MarkerOptions, PixelBuffer, SpectrogramOptions, WaveformOptions,
};
use std::f32::consts::PI;

fn tone(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

#[test]
fn encoded_wav_decodes_with_hound() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.wav");
    let bytes = encode_pcm16(&[0.0, 0.5, -1.0, 1.0], 44100).unwrap();
    std::fs::write(&path, &bytes).unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![0, 16384, -32768, 32767]);
    assert_eq!(bytes.len(), HEADER_LEN + 8);
}

#[test]
fn long_tone_round_trips_through_hound() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    let samples = tone(440.0, 16000, 16000);
    std::fs::write(&path, encode_pcm16(&samples, 16000).unwrap()).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.duration(), 16000);
    let decoded: Vec<f32> = reader
        .into_samples::<i16>()
        .map(|s| s.unwrap() as f32 / 32767.0)
        .collect();
    for (a, b) in samples.iter().zip(&decoded) {
        assert!((a - b).abs() < 1e-3);
    }
}

#[test]
fn spectrum_of_tone_renders_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spectrum.png");
    let samples = tone(1000.0, 8000, 4096);

    let spectrum = magnitude_spectrum(&samples, 8000, &AnalysisOptions::default()).unwrap();
    let (peak_hz, _) = spectrum.peak().unwrap();
    assert!((peak_hz - 1000.0).abs() <= 8000.0 / 4096.0);

    let mut image = PixelBuffer::new(600, 300);
    let summary = draw_frequency_graph(
        &mut image,
        &spectrum,
        ScaleMode::Perceptual,
        &FrequencyGraphOptions::default(),
    );
    assert_eq!(summary.segments, spectrum.len() - 1);

    image.save_png(&path).unwrap();
    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (600, 300));
    assert_eq!(decoded.as_raw(), image.as_raw());
}

#[test]
fn spectrogram_and_waveform_render_into_image_buffers() {
    let samples = tone(500.0, 8000, 8000);

    let matrix = spectrogram(&samples, 8000, &SpectrogramSettings::default()).unwrap();
    assert_eq!(matrix.bins(), 512);
    assert_eq!(matrix.frames(), (8000 - 512) / 512);

    let mut heat = image::RgbaImage::new(400, 200);
    let summary = draw_spectrogram(&mut heat, &matrix, &SpectrogramOptions::default());
    assert_eq!(summary.cells, matrix.bins() * matrix.frames());

    let mut wave = image::RgbaImage::new(540, 200);
    let summary = draw_waveform(&mut wave, &samples, &WaveformOptions::default());
    assert_eq!(summary.points, 500);
    assert!(draw_position_marker(Some(&mut wave), 0.5, &MarkerOptions::default()));
    assert_eq!(wave.get_pixel(270, 100).0, [255, 0, 0, 255]);
}

#[test]
fn empty_buffer_is_not_an_error() {
    let matrix = spectrogram(&[], 44100, &SpectrogramSettings::default()).unwrap();
    assert_eq!(matrix.frames(), 0);

    let spectrum = magnitude_spectrum(&[], 44100, &AnalysisOptions::default()).unwrap();
    assert!(spectrum.is_empty());

    let bytes = encode_pcm16(&[], 44100).unwrap();
    assert_eq!(bytes.len(), HEADER_LEN);

    let mut target = PixelBuffer::new(0, 0);
    draw_waveform(&mut target, &[], &WaveformOptions::default());
    draw_spectrogram(&mut target, &matrix, &SpectrogramOptions::default());
}
