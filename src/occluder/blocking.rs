/// A kind of sense or effect that occluders may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channel {
    #[default]
    Sight,
    Light,
    Sound,
    Movement,
}

/// How an occluder restricts one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Blocking {
    /// Transparent for this channel.
    None,
    /// Fully opaque.
    #[default]
    Normal,
    /// Partially blocking: seeing through one terrain occluder is allowed,
    /// the second one along a ray blocks.
    Terrain,
}

impl Blocking {
    /// Returns `true` unless the occluder is transparent.
    #[must_use]
    pub fn blocks(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns `true` for partial blocking.
    #[must_use]
    pub fn is_terrain(self) -> bool {
        matches!(self, Self::Terrain)
    }
}

/// Per-channel blocking classification of an occluder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelBlocking {
    pub sight: Blocking,
    pub light: Blocking,
    pub sound: Blocking,
    pub movement: Blocking,
}

impl ChannelBlocking {
    /// The same classification on every channel.
    #[must_use]
    pub fn uniform(blocking: Blocking) -> Self {
        Self {
            sight: blocking,
            light: blocking,
            sound: blocking,
            movement: blocking,
        }
    }

    /// Blocking for one channel.
    #[must_use]
    pub fn get(&self, channel: Channel) -> Blocking {
        match channel {
            Channel::Sight => self.sight,
            Channel::Light => self.light,
            Channel::Sound => self.sound,
            Channel::Movement => self.movement,
        }
    }

    /// Returns a copy with `channel` set to `blocking`.
    #[must_use]
    pub fn with(mut self, channel: Channel, blocking: Blocking) -> Self {
        match channel {
            Channel::Sight => self.sight = blocking,
            Channel::Light => self.light = blocking,
            Channel::Sound => self.sound = blocking,
            Channel::Movement => self.movement = blocking,
        }
        self
    }
}

/// One-sided blocking of an occluder, relative to the direction `a -> b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    /// Blocks from both sides.
    #[default]
    Both,
    /// Blocks only origins on the left of `a -> b` (y-up frame).
    Left,
    /// Blocks only origins on the right of `a -> b` (y-up frame).
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_and_override() {
        let b = ChannelBlocking::uniform(Blocking::Normal).with(Channel::Sound, Blocking::None);
        assert_eq!(b.get(Channel::Sight), Blocking::Normal);
        assert_eq!(b.get(Channel::Sound), Blocking::None);
        assert!(!b.get(Channel::Sound).blocks());
        assert!(Blocking::Terrain.blocks() && Blocking::Terrain.is_terrain());
    }
}
