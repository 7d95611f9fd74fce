//! Cell addressing shared by every packed buffer.

/// Adjacency slots carried by one texel
pub const CHANNELS: u32 = 4;

/// Smallest `r` with `r * r >= count`.
pub const fn resolution_for(count: u32) -> u32 {
    let count = count as u64;
    let mut lo = 0u64;
    let mut hi = 65536u64;
    while lo < hi {
        let mid = (lo + hi) / 2;
        if mid * mid >= count {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo as u32
}

pub const fn layers_for(max_ring: u32) -> u32 {
    max_ring.div_ceil(CHANNELS)
}

/// `(column, row)` of cell `index` in a grid of side `resolution`
pub const fn cell_coordinates(index: u32, resolution: u32) -> [u32; 2] {
    [index % resolution, index / resolution]
}

/// Flat texel offset and channel of adjacency slot `slot` for the vertex in `cell`.
pub const fn adjacency_slot(cell: usize, slot: usize, cells: usize) -> (usize, usize) {
    let channels = CHANNELS as usize;
    ((slot / channels) * cells + cell, slot % channels)
}
