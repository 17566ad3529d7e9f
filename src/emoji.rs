use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Color prefix of a roster status cell ("GREEN: 7")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorCategory {
    Green,
    Red,
    Blue,
    Purple,
    Orange,
}

impl ColorCategory {
    /// Maps an uppercased color token; any other color has no category
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GREEN" => Some(ColorCategory::Green),
            "RED" => Some(ColorCategory::Red),
            "BLUE" => Some(ColorCategory::Blue),
            "PURPLE" => Some(ColorCategory::Purple),
            "ORANGE" => Some(ColorCategory::Orange),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiStyle {
    #[default]
    Circles,
    Animal1,
    Animal2,
    Fruits,
    Hearts,
}

impl EmojiStyle {
    pub const ALL: [EmojiStyle; 5] = [
        EmojiStyle::Circles,
        EmojiStyle::Animal1,
        EmojiStyle::Animal2,
        EmojiStyle::Fruits,
        EmojiStyle::Hearts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmojiStyle::Circles => "circles",
            EmojiStyle::Animal1 => "animal1",
            EmojiStyle::Animal2 => "animal2",
            EmojiStyle::Fruits => "fruits",
            EmojiStyle::Hearts => "hearts",
        }
    }
}

impl fmt::Display for EmojiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmojiStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        EmojiStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| format!("unknown emoji style '{}' (expected one of circles, animal1, animal2, fruits, hearts)", s))
    }
}

/// Candidate glyphs for a color in a given style. Every pair in the bank is non-empty.
pub fn glyphs(color: ColorCategory, style: EmojiStyle) -> &'static [&'static str] {
    use ColorCategory::*;
    use EmojiStyle::*;

    match (color, style) {
        (Green, Circles) => &["🟢"],
        (Green, Animal1) => &["🐢", "🐸"],
        (Green, Animal2) => &["🦖", "🦎"],
        (Green, Fruits) => &["🥝", "🍐"],
        (Green, Hearts) => &["💚"],

        (Red, Circles) => &["🔴"],
        (Red, Animal1) => &["🦐", "🦀"],
        (Red, Animal2) => &["🦊"],
        (Red, Fruits) => &["🍎", "🍒"],
        (Red, Hearts) => &["❤️"],

        (Blue, Circles) => &["🔵"],
        (Blue, Animal1) => &["🐟", "🐳"],
        (Blue, Animal2) => &["🐬", "🦕"],
        (Blue, Fruits) => &["🫐"],
        (Blue, Hearts) => &["💙"],

        (Purple, Circles) => &["🟣"],
        (Purple, Animal1) => &["🦄"],
        (Purple, Animal2) => &["👾"],
        (Purple, Fruits) => &["🍇"],
        (Purple, Hearts) => &["💜"],

        (Orange, Circles) => &["🟠"],
        (Orange, Animal1) => &["🦊"],
        (Orange, Animal2) => &["🦁"],
        (Orange, Fruits) => &["🍊", "🎃"],
        (Orange, Hearts) => &["🧡"],
    }
}

/// Picks one glyph for the color, uniformly at random.
/// Colors without a category get no emoji.
pub fn select_emoji<R: Rng + ?Sized>(
    category: Option<ColorCategory>,
    style: EmojiStyle,
    rng: &mut R,
) -> Option<&'static str> {
    let candidates = glyphs(category?, style);
    candidates.choose(rng).copied()
}
