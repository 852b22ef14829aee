use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainCategory {
    Water,
    Sand,
    Grass,
    Forest,
    Mountain,
    Rock,
}

impl TerrainCategory {
    /// Every category, lowest height band first.
    pub const ALL: [Self; 6] =
        [Self::Water, Self::Sand, Self::Grass, Self::Forest, Self::Mountain, Self::Rock];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            Self::Water => 0,
            Self::Sand => 1,
            Self::Grass => 2,
            Self::Forest => 3,
            Self::Mountain => 4,
            Self::Rock => 5,
        }
    }

    pub fn is_walkable(self) -> bool {
        !matches!(self, Self::Water | Self::Rock)
    }

    pub fn is_resource_eligible(self) -> bool {
        !matches!(self, Self::Water | Self::Rock)
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Water => '~',
            Self::Sand => '.',
            Self::Grass => ',',
            Self::Forest => 'T',
            Self::Mountain => '^',
            Self::Rock => '#',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Wood,
    Stone,
    Metal,
    Food,
    Water,
}

impl ResourceType {
    pub const ALL: [Self; 5] = [Self::Wood, Self::Stone, Self::Metal, Self::Food, Self::Water];

    pub fn code(self) -> u8 {
        match self {
            Self::Wood => 0,
            Self::Stone => 1,
            Self::Metal => 2,
            Self::Food => 3,
            Self::Water => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
