//! Audio clip references
//!
//! An [`AudioClip`] is a cheap, shareable reference to encoded audio data owned
//! by whoever loaded it. The SFX player only reads clips; it never mutates or
//! frees them. Two clips are equal only if they refer to the same loaded asset.

use crate::audio::AudioError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WAV uncompressed
    Wav,
    /// OGG Vorbis compressed
    Ogg,
    /// MP3 compressed
    Mp3,
    /// FLAC lossless
    Flac,
    /// Unknown format
    Unknown,
}

impl AudioFormat {
    /// Detect audio format from magic bytes
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.len() < 4 {
            return Self::Unknown;
        }

        match &bytes[0..4] {
            b"RIFF" => Self::Wav,
            b"OggS" => Self::Ogg,
            b"fLaC" => Self::Flac,
            // MP3 can start with ID3 tag or an 11-bit frame sync (MPEG 1, 2 and 2.5)
            [0xFF, b, _, _] if b & 0xE0 == 0xE0 => Self::Mp3,
            [b'I', b'D', b'3', _] => Self::Mp3,
            _ => Self::Unknown,
        }
    }
}

struct ClipData {
    name: String,
    data: Arc<[u8]>,
    format: AudioFormat,
    duration: Option<Duration>,
}

/// Shared reference to a loaded audio clip
#[derive(Clone)]
pub struct AudioClip {
    inner: Arc<ClipData>,
}

impl AudioClip {
    /// Create a clip from encoded audio bytes
    ///
    /// # Errors
    /// - `ClipLoad` if the data is empty or the format is not recognised
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AudioError> {
        let name = name.into();
        if bytes.is_empty() {
            return Err(AudioError::ClipLoad(format!("{name}: empty audio data")));
        }

        let format = AudioFormat::detect(&bytes);
        if format == AudioFormat::Unknown {
            return Err(AudioError::ClipLoad(format!("{name}: unknown audio format")));
        }

        let data: Arc<[u8]> = bytes.into();
        let duration = match format {
            AudioFormat::Wav => wav_duration(&data),
            _ => decoded_duration(&data),
        };
        if duration.is_none() {
            log::debug!("Clip '{name}' has no known duration");
        }

        Ok(Self {
            inner: Arc::new(ClipData {
                name,
                data,
                format,
                duration,
            }),
        })
    }

    /// Load a clip from a file, naming it after the file stem
    ///
    /// # Errors
    /// - `Io` if the file cannot be read
    /// - `ClipLoad` if the contents are not a recognised audio format
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        let clip = Self::from_bytes(name, bytes)?;
        log::debug!("Loaded clip '{}' from {}", clip.name(), path.display());
        Ok(clip)
    }

    /// Return a new clip sharing this clip's data with an explicit duration
    pub fn with_duration(&self, duration: Duration) -> Self {
        Self {
            inner: Arc::new(ClipData {
                name: self.inner.name.clone(),
                data: Arc::clone(&self.inner.data),
                format: self.inner.format,
                duration: Some(duration),
            }),
        }
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Encoded audio bytes
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Shared handle to the encoded bytes, for decoders that need ownership
    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.inner.data)
    }

    /// Detected format
    pub fn format(&self) -> AudioFormat {
        self.inner.format
    }

    /// Playback length at neutral pitch, if known
    pub fn duration(&self) -> Option<Duration> {
        self.inner.duration
    }
}

impl PartialEq for AudioClip {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for AudioClip {}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioClip")
            .field("name", &self.inner.name)
            .field("format", &self.inner.format)
            .field("bytes", &self.inner.data.len())
            .field("duration", &self.inner.duration)
            .finish()
    }
}

fn read_u32_le(bytes: &[u8], offset: usize) -> Option<u32> {
    let raw = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Compute a WAV clip's length from its `fmt ` and `data` chunks
fn wav_duration(bytes: &[u8]) -> Option<Duration> {
    if bytes.get(8..12)? != b"WAVE" {
        return None;
    }

    let mut offset = 12;
    let mut byte_rate = None;
    let mut data_len = None;

    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = read_u32_le(bytes, offset + 4)? as usize;
        let body = offset + 8;

        match id {
            b"fmt " => byte_rate = read_u32_le(bytes, body + 8),
            b"data" => data_len = Some(size.min(bytes.len().saturating_sub(body))),
            _ => {}
        }
        if byte_rate.is_some() && data_len.is_some() {
            break;
        }

        // Chunks are word aligned
        offset = body + size + (size & 1);
    }

    match (byte_rate, data_len) {
        (Some(rate), Some(len)) if rate > 0 => {
            Some(Duration::from_secs_f64(len as f64 / f64::from(rate)))
        }
        _ => None,
    }
}

#[cfg(feature = "rodio")]
fn decoded_duration(data: &Arc<[u8]>) -> Option<Duration> {
    use rodio::Source;

    let decoder = rodio::Decoder::new(std::io::Cursor::new(Arc::clone(data))).ok()?;
    if let Some(duration) = decoder.total_duration() {
        return Some(duration);
    }

    // Vorbis and MP3 decoders report no length; decode once to measure it
    let sample_rate = decoder.sample_rate();
    let channels = decoder.channels();
    length_from_samples(decoder.count(), sample_rate, channels)
}

/// Playback length of `samples` interleaved samples
#[cfg(feature = "rodio")]
fn length_from_samples(samples: usize, sample_rate: u32, channels: u16) -> Option<Duration> {
    let per_second = f64::from(sample_rate) * f64::from(channels);
    (per_second > 0.0).then(|| Duration::from_secs_f64(samples as f64 / per_second))
}

#[cfg(not(feature = "rodio"))]
fn decoded_duration(_data: &Arc<[u8]>) -> Option<Duration> {
    None
}
