use bitflags::bitflags;

bitflags! {
    /// Outputs an extractor is asked to expose.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ExtractFlags: u16 {
        const POSITION = 0b0000_0000_0000_0001;
        const POSITION_PAIR = 0b0000_0000_0000_0010;
        const NORMAL = 0b0000_0000_0000_0100;
        const ERROR = 0b0000_0000_0000_1000;

        const ALL = Self::POSITION.bits() | Self::POSITION_PAIR.bits() | Self::NORMAL.bits() | Self::ERROR.bits();
    }
}
