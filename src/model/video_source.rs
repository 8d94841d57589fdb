//! Canonical descriptor of an episode's playable video

use serde::{Deserialize, Serialize};

/// Where an episode's video lives
///
/// Every variant carries a canonical `direct_link` (what a person would open)
/// and an `embed_url` (what goes into a player frame). The serialized tag is
/// stable and doubles as the variant's `kind()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VideoSource {
    /// A file hosted on the drive-style host, identified by its file id
    #[serde(rename = "google_drive")]
    DriveEmbed {
        file_id: String,
        direct_link: String,
        embed_url: String,
    },

    #[serde(rename = "mega")]
    MegaEmbed {
        direct_link: String,
        embed_url: String,
    },

    #[serde(rename = "youtube")]
    YoutubeEmbed {
        direct_link: String,
        embed_url: String,
    },

    /// A native `<video>` element source
    #[serde(rename = "html5")]
    Html5Direct {
        direct_link: String,
        embed_url: String,
    },

    /// A frame on a whitelisted host with no dedicated handling
    #[serde(rename = "iframe_embed")]
    GenericIframe {
        direct_link: String,
        embed_url: String,
    },

    /// A media file URL found anywhere in the markup
    #[serde(rename = "direct_video")]
    DirectFileLink {
        direct_link: String,
        embed_url: String,
    },
}

impl VideoSource {
    pub fn drive(file_id: impl Into<String>) -> Self {
        let file_id = file_id.into();
        Self::DriveEmbed {
            direct_link: format!("https://drive.google.com/file/d/{}/view", file_id),
            embed_url: format!("https://drive.google.com/file/d/{}/preview", file_id),
            file_id,
        }
    }

    pub fn mega(link: impl Into<String>) -> Self {
        let link = link.into();
        Self::MegaEmbed {
            direct_link: link.clone(),
            embed_url: link,
        }
    }

    pub fn youtube(link: impl Into<String>) -> Self {
        let link = link.into();
        Self::YoutubeEmbed {
            direct_link: link.clone(),
            embed_url: link,
        }
    }

    pub fn html5(link: impl Into<String>) -> Self {
        let link = link.into();
        Self::Html5Direct {
            direct_link: link.clone(),
            embed_url: link,
        }
    }

    pub fn iframe(link: impl Into<String>) -> Self {
        let link = link.into();
        Self::GenericIframe {
            direct_link: link.clone(),
            embed_url: link,
        }
    }

    pub fn direct_file(link: impl Into<String>) -> Self {
        let link = link.into();
        Self::DirectFileLink {
            direct_link: link.clone(),
            embed_url: link,
        }
    }

    /// Stable kind tag, identical to the serialized `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DriveEmbed { .. } => "google_drive",
            Self::MegaEmbed { .. } => "mega",
            Self::YoutubeEmbed { .. } => "youtube",
            Self::Html5Direct { .. } => "html5",
            Self::GenericIframe { .. } => "iframe_embed",
            Self::DirectFileLink { .. } => "direct_video",
        }
    }

    pub fn direct_link(&self) -> &str {
        match self {
            Self::DriveEmbed { direct_link, .. }
            | Self::MegaEmbed { direct_link, .. }
            | Self::YoutubeEmbed { direct_link, .. }
            | Self::Html5Direct { direct_link, .. }
            | Self::GenericIframe { direct_link, .. }
            | Self::DirectFileLink { direct_link, .. } => direct_link,
        }
    }

    pub fn embed_url(&self) -> &str {
        match self {
            Self::DriveEmbed { embed_url, .. }
            | Self::MegaEmbed { embed_url, .. }
            | Self::YoutubeEmbed { embed_url, .. }
            | Self::Html5Direct { embed_url, .. }
            | Self::GenericIframe { embed_url, .. }
            | Self::DirectFileLink { embed_url, .. } => embed_url,
        }
    }

    /// Renders the embeddable HTML snippet for this source
    pub fn embed_code(&self) -> String {
        match self {
            Self::DriveEmbed { embed_url, .. } => format!(
                r#"<iframe src="{}" width="100%" height="480" allowfullscreen></iframe>"#,
                embed_url
            ),
            Self::YoutubeEmbed { embed_url, .. } => format!(
                r#"<iframe src="{}" width="560" height="315" frameborder="0" allowfullscreen></iframe>"#,
                embed_url
            ),
            Self::MegaEmbed { embed_url, .. } | Self::GenericIframe { embed_url, .. } => format!(
                r#"<iframe src="{}" width="100%" height="480" frameborder="0" allowfullscreen></iframe>"#,
                embed_url
            ),
            Self::Html5Direct { embed_url, .. } | Self::DirectFileLink { embed_url, .. } => {
                format!(
                    r#"<video src="{}" controls width="100%" height="480"></video>"#,
                    embed_url
                )
            }
        }
    }
}
