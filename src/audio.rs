#![allow(missing_docs)]
//! Audio format sniffing for transcription uploads.
//!
//! The transcription endpoint wants a filename and MIME type on the multipart
//! file part; callers usually hand us raw bytes, so the container format is
//! detected from magic bytes.

/// Audio container formats the transcription endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    M4a,
    Webm,
    Unknown,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::M4a => "audio/mp4",
            Self::Webm => "audio/webm",
            Self::Unknown => "application/octet-stream",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::M4a => "m4a",
            Self::Webm => "webm",
            Self::Unknown => "bin",
        }
    }
}

/// Sniff the audio container format from the first bytes of `data`.
pub fn detect_audio_format(data: &[u8]) -> AudioFormat {
    if data.len() < 12 {
        return AudioFormat::Unknown;
    }

    if &data[..4] == b"RIFF" && &data[8..12] == b"WAVE" {
        return AudioFormat::Wav;
    }
    // ID3 tag or MPEG frame sync
    if &data[..3] == b"ID3" || (data[0] == 0xFF && (data[1] & 0xE0) == 0xE0) {
        return AudioFormat::Mp3;
    }
    if &data[..4] == b"OggS" {
        return AudioFormat::Ogg;
    }
    if &data[..4] == b"fLaC" {
        return AudioFormat::Flac;
    }
    // MP4/M4A: "ftyp" atom at offset 4
    if &data[4..8] == b"ftyp" {
        return AudioFormat::M4a;
    }
    // WebM EBML header
    if data[..4] == [0x1A, 0x45, 0xDF, 0xA3] {
        return AudioFormat::Webm;
    }

    AudioFormat::Unknown
}

/// Filename to attach to an uploaded audio part, based on sniffed format.
pub fn upload_filename(data: &[u8]) -> String {
    format!("audio.{}", detect_audio_format(data).extension())
}
