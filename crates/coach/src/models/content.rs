use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One element of a mixed text/image message, as sent by the app.
///
/// Image parts arrive either as `{"type": "image_url", "image_url": {"url": ...}}` or with the
/// url directly on the part, `{"type": "image_url", "url": ...}`. Both read into the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "RawContentPart")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawContentPart {
    Text {
        text: String,
    },
    ImageUrl {
        #[serde(default)]
        image_url: Option<ImageUrl>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl TryFrom<RawContentPart> for ContentPart {
    type Error = String;

    fn try_from(raw: RawContentPart) -> Result<Self, Self::Error> {
        match raw {
            RawContentPart::Text { text } => Ok(ContentPart::Text { text }),
            RawContentPart::ImageUrl { image_url, url } => image_url
                .or(url.map(|url| ImageUrl { url }))
                .map(|image_url| ContentPart::ImageUrl { image_url })
                .ok_or_else(|| "image_url part without a url".to_string()),
        }
    }
}

impl ContentPart {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url<S: Into<String>>(url: S) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    /// Get the text if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            _ => None,
        }
    }
}
