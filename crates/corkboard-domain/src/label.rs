use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type LabelId = Uuid;

/// Fixed label palette. Color is the uniqueness key within a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelColor {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
    Blue,
    Sky,
    Lime,
    Pink,
    Black,
}

impl LabelColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Blue => "blue",
            Self::Sky => "sky",
            Self::Lime => "lime",
            Self::Pink => "pink",
            Self::Black => "black",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Self::Green => "#61bd4f",
            Self::Yellow => "#f2d600",
            Self::Orange => "#ff9f1a",
            Self::Red => "#eb5a46",
            Self::Purple => "#c377e0",
            Self::Blue => "#0079bf",
            Self::Sky => "#00c2e0",
            Self::Lime => "#51e898",
            Self::Pink => "#ff78cb",
            Self::Black => "#344563",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: LabelId,
    pub color: LabelColor,
    #[serde(default)]
    pub title: Option<String>,
}

impl Label {
    pub fn new(color: LabelColor, title: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            color,
            title,
        }
    }
}
