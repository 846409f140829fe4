/// A conversion offered on the landing screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionKind {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub icon: &'static str,
    /// Only available kinds open a converter; the rest are shown as coming soon.
    pub available: bool,
}

pub const VIDEO_TO_MP3: &str = "mp4-to-mp3";

pub const CATALOG: &[ConversionKind] = &[
    ConversionKind {
        id: VIDEO_TO_MP3,
        title: "MP4 to MP3",
        description: "Extract the audio track from a video",
        from: "MP4",
        to: "MP3",
        icon: "\u{1F3B5}",
        available: true,
    },
    ConversionKind {
        id: "mp3-to-wav",
        title: "MP3 to WAV",
        description: "Turn MP3 audio into WAV",
        from: "MP3",
        to: "WAV",
        icon: "\u{1F50A}",
        available: false,
    },
    ConversionKind {
        id: "docx-to-pdf",
        title: "DOCX to PDF",
        description: "Turn Word documents into PDF",
        from: "DOCX",
        to: "PDF",
        icon: "\u{1F4C4}",
        available: false,
    },
    ConversionKind {
        id: "png-to-jpg",
        title: "PNG to JPG",
        description: "Turn PNG images into JPG",
        from: "PNG",
        to: "JPG",
        icon: "\u{1F5BC}",
        available: false,
    },
    ConversionKind {
        id: "pdf-to-docx",
        title: "PDF to DOCX",
        description: "Turn PDFs into Word documents",
        from: "PDF",
        to: "DOCX",
        icon: "\u{1F4DD}",
        available: false,
    },
    ConversionKind {
        id: "jpg-to-png",
        title: "JPG to PNG",
        description: "Turn JPG images into PNG",
        from: "JPG",
        to: "PNG",
        icon: "\u{1F3A8}",
        available: false,
    },
];

pub fn find(id: &str) -> Option<&'static ConversionKind> {
    CATALOG.iter().find(|k| k.id == id)
}
