//! Display interface payloads for devices with a screen.

use serde::Deserialize;
use serde::Serialize;

/// Body (`BodyTemplate*`) or list (`ListTemplate*`) template to render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTemplate {
    #[serde(rename = "type")]
    pub template_type: String,

    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_button: Option<BackButton>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<DisplayImageObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<TextContent>,

    /// Scrollable items for list templates. Empty for body templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list_items: Vec<DisplayListItem>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackButton {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub primary_text: DisplayTextContent,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<DisplayTextContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_text: Option<DisplayTextContent>,
}

impl TextContent {
    pub fn plain(primary: impl Into<String>) -> Self {
        Self {
            primary_text: DisplayTextContent::plain(primary),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisplayListItem {
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<DisplayImageObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<TextContent>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TextType {
    #[default]
    PlainText,
    RichText,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DisplayTextContent {
    #[serde(rename = "type")]
    pub text_type: TextType,

    pub text: String,
}

impl DisplayTextContent {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text_type: TextType::PlainText,
            text: text.into(),
        }
    }

    pub fn rich(text: impl Into<String>) -> Self {
        Self {
            text_type: TextType::RichText,
            text: text.into(),
        }
    }
}

/// An image with one or more sized sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisplayImageObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_description: Option<String>,

    #[serde(default)]
    pub sources: Vec<DisplayImageSource>,
}

impl DisplayImageObject {
    /// Append a source and return it for further adjustment.
    pub fn add_image_source(
        &mut self,
        url: impl Into<String>,
        size: Option<ImageSize>,
        width_pixels: Option<u32>,
        height_pixels: Option<u32>,
    ) -> &mut DisplayImageSource {
        let index = self.sources.len();
        self.sources.push(DisplayImageSource {
            url: url.into(),
            size,
            width_pixels,
            height_pixels,
        });
        &mut self.sources[index]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisplayImageSource {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_pixels: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_pixels: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageSize {
    XSmall,
    Small,
    Medium,
    Large,
    XLarge,
}
