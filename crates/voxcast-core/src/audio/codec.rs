//! Codec boundary: encoded byte streams in, encoded byte streams out.
//!
//! Decoding probes the container with symphonia (MP3 and WAV among the
//! enabled readers) and falls back to a plain hound WAV parse for streams
//! symphonia rejects. Encoding writes 16-bit PCM WAV via hound or
//! 192 kbit/s constant-rate MP3 via LAME.

use std::io::Cursor;

use tracing::debug;

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use crate::types::OutputFormat;

/// Constant MP3 output bitrate.
const MP3_BITRATE: mp3lame_encoder::Bitrate = mp3lame_encoder::Bitrate::Kbps192;

/// Decode an encoded audio byte stream into a PCM buffer.
///
/// Channel count and sample rate are taken from the stream; samples are
/// sanitized to finite values in `[-1, 1]`. An empty or undecodable stream
/// is an error: the pipeline never operates on half-decoded audio.
pub fn decode(bytes: &[u8]) -> Result<AudioBuffer> {
    if bytes.is_empty() {
        return Err(Error::Decode("empty audio byte stream".to_string()));
    }

    let buffer = match decode_symphonia(bytes) {
        Ok(buffer) => buffer,
        Err(symphonia_err) => decode_wav_hound(bytes).map_err(|wav_err| {
            Error::Decode(format!(
                "unsupported audio data (symphonia: {symphonia_err}; WAV fallback: {wav_err})"
            ))
        })?,
    };

    finalize(buffer)
}

/// Encode a PCM buffer into the requested container format.
pub fn encode(buffer: &AudioBuffer, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Wav => encode_wav(buffer),
        OutputFormat::Mp3 => encode_mp3(buffer),
    }
}

fn decode_symphonia(bytes: &[u8]) -> Result<AudioBuffer> {
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::DecoderOptions;
    use symphonia::core::errors::Error as SymphoniaError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;
    use symphonia::default::{get_codecs, get_probe};

    let media_source =
        MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let probed = get_probe()
        .format(
            &Hint::new(),
            media_source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Decode(format!("format probe failed: {e}")))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| Error::Decode("no default audio track found".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("failed to create decoder: {e}")))?;

    let mut channels = 0usize;
    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::ResetRequired) => {
                return Err(Error::Decode(
                    "audio stream format reset is not supported".to_string(),
                ));
            }
            Err(err) => {
                return Err(Error::Decode(format!("failed reading audio packets: {err}")));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Skip corrupt frames, common at MP3 chunk joins.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                return Err(Error::Decode("decoder reset is not supported".to_string()));
            }
            Err(err) => {
                return Err(Error::Decode(format!("failed decoding audio packet: {err}")));
            }
        };

        if sample_rate == 0 {
            sample_rate = decoded.spec().rate;
        }
        if channels == 0 {
            channels = decoded.spec().channels.count().max(1);
        }

        let mut sample_buffer =
            SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        sample_buffer.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sample_buffer.samples());
    }

    if sample_rate == 0 {
        return Err(Error::Decode(
            "decoded audio is missing sample rate metadata".to_string(),
        ));
    }
    if samples.is_empty() {
        return Err(Error::Decode("decoded audio produced zero samples".to_string()));
    }

    debug!(
        "decoded {} samples at {} Hz ({} channel(s))",
        samples.len(),
        sample_rate,
        channels
    );

    AudioBuffer::new(samples, sample_rate, channels as u16)
}

fn decode_wav_hound(bytes: &[u8]) -> Result<AudioBuffer> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| Error::Decode(format!("failed to parse WAV: {e}")))?;

    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample.max(1) as u32;
            let max_val = if bits > 1 {
                ((1i64 << (bits - 1)) - 1) as f32
            } else {
                1.0
            };
            reader
                .samples::<i32>()
                .filter_map(|s| s.ok())
                .map(|s| (s as f32 / max_val).clamp(-1.0, 1.0))
                .collect()
        }
        hound::SampleFormat::Float => reader.samples::<f32>().filter_map(|s| s.ok()).collect(),
    };

    AudioBuffer::new(samples, spec.sample_rate, spec.channels.max(1))
}

fn finalize(mut buffer: AudioBuffer) -> Result<AudioBuffer> {
    if buffer.is_empty() {
        return Err(Error::Decode("decoded audio contains no samples".to_string()));
    }
    for sample in &mut buffer.samples {
        if !sample.is_finite() {
            *sample = 0.0;
        } else {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }
    Ok(buffer)
}

fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let cursor = Cursor::new(&mut bytes);
        let mut writer = hound::WavWriter::new(cursor, spec)
            .map_err(|e| Error::Encode(format!("failed to start WAV writer: {e}")))?;
        for &sample in &buffer.samples {
            writer
                .write_sample(pcm16(sample))
                .map_err(|e| Error::Encode(format!("failed to write WAV sample: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| Error::Encode(format!("failed to finalize WAV: {e}")))?;
    }
    Ok(bytes)
}

fn encode_mp3(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    use mp3lame_encoder::{Builder, FlushNoGap, InterleavedPcm, MonoPcm, Quality};

    if buffer.channels > 2 {
        return Err(Error::Encode(format!(
            "MP3 output supports at most 2 channels, got {}",
            buffer.channels
        )));
    }

    let mut builder = Builder::new()
        .ok_or_else(|| Error::Encode("failed to allocate LAME encoder".to_string()))?;
    builder
        .set_num_channels(buffer.channels as u8)
        .map_err(|e| Error::Encode(format!("unsupported channel count: {e}")))?;
    builder
        .set_sample_rate(buffer.sample_rate)
        .map_err(|e| Error::Encode(format!("unsupported sample rate: {e}")))?;
    builder
        .set_brate(MP3_BITRATE)
        .map_err(|e| Error::Encode(format!("unsupported bitrate: {e}")))?;
    builder
        .set_quality(Quality::Best)
        .map_err(|e| Error::Encode(format!("unsupported quality: {e}")))?;
    let mut encoder = builder
        .build()
        .map_err(|e| Error::Encode(format!("failed to initialize MP3 encoder: {e}")))?;

    let pcm: Vec<i16> = buffer.samples.iter().map(|&s| pcm16(s)).collect();
    let mut bytes = Vec::new();
    bytes.reserve(mp3lame_encoder::max_required_buffer_size(buffer.frames()));

    let written = match buffer.channels {
        1 => encoder.encode(MonoPcm(&pcm), bytes.spare_capacity_mut()),
        _ => encoder.encode(InterleavedPcm(&pcm), bytes.spare_capacity_mut()),
    }
    .map_err(|e| Error::Encode(format!("MP3 encode failed: {e}")))?;
    // SAFETY: the encoder initialized `written` bytes of the spare capacity.
    unsafe { bytes.set_len(bytes.len() + written) };

    let written = encoder
        .flush::<FlushNoGap>(bytes.spare_capacity_mut())
        .map_err(|e| Error::Encode(format!("MP3 flush failed: {e}")))?;
    // SAFETY: as above, for the flushed tail.
    unsafe { bytes.set_len(bytes.len() + written) };

    Ok(bytes)
}

fn pcm16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}
