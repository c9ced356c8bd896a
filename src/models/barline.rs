//! Barlines, repeats, and endings

use serde::{Deserialize, Serialize};

use crate::models::common::BackwardForward;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Barline {
    pub location: Option<BarlineLocation>,
    pub bar_style: Option<BarStyle>,
    pub repeat: Option<Repeat>,
    pub ending: Option<Ending>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarlineLocation {
    Left,
    Right,
    Middle,
}

impl BarlineLocation {
    pub fn name(self) -> &'static str {
        match self {
            BarlineLocation::Left => "left",
            BarlineLocation::Right => "right",
            BarlineLocation::Middle => "middle",
        }
    }

    pub fn from_name(s: &str) -> Option<BarlineLocation> {
        match s {
            "left" => Some(BarlineLocation::Left),
            "right" => Some(BarlineLocation::Right),
            "middle" => Some(BarlineLocation::Middle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarStyle {
    Regular,
    Dotted,
    Dashed,
    Heavy,
    LightLight,
    LightHeavy,
    HeavyLight,
    HeavyHeavy,
    Tick,
    Short,
    None,
}

impl BarStyle {
    pub fn name(self) -> &'static str {
        match self {
            BarStyle::Regular => "regular",
            BarStyle::Dotted => "dotted",
            BarStyle::Dashed => "dashed",
            BarStyle::Heavy => "heavy",
            BarStyle::LightLight => "light-light",
            BarStyle::LightHeavy => "light-heavy",
            BarStyle::HeavyLight => "heavy-light",
            BarStyle::HeavyHeavy => "heavy-heavy",
            BarStyle::Tick => "tick",
            BarStyle::Short => "short",
            BarStyle::None => "none",
        }
    }

    pub fn from_name(s: &str) -> Option<BarStyle> {
        match s {
            "regular" => Some(BarStyle::Regular),
            "dotted" => Some(BarStyle::Dotted),
            "dashed" => Some(BarStyle::Dashed),
            "heavy" => Some(BarStyle::Heavy),
            "light-light" => Some(BarStyle::LightLight),
            "light-heavy" => Some(BarStyle::LightHeavy),
            "heavy-light" => Some(BarStyle::HeavyLight),
            "heavy-heavy" => Some(BarStyle::HeavyHeavy),
            "tick" => Some(BarStyle::Tick),
            "short" => Some(BarStyle::Short),
            "none" => Some(BarStyle::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repeat {
    pub direction: BackwardForward,
    pub times: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ending {
    /// Comma-separated list of ending numbers, e.g. "1, 2".
    pub number: String,
    pub ending_type: EndingType,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndingType {
    Start,
    Stop,
    Discontinue,
}

impl EndingType {
    pub fn name(self) -> &'static str {
        match self {
            EndingType::Start => "start",
            EndingType::Stop => "stop",
            EndingType::Discontinue => "discontinue",
        }
    }

    pub fn from_name(s: &str) -> Option<EndingType> {
        match s {
            "start" => Some(EndingType::Start),
            "stop" => Some(EndingType::Stop),
            "discontinue" => Some(EndingType::Discontinue),
            _ => None,
        }
    }
}
