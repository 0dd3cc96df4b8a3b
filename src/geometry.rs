//! Positions, dimensions and the clipping arithmetic shared by every drawable.

/// Which point of a rectangle a `Position` refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

/// A signed pixel coordinate `(x, y)` together with the reference point of the rectangle it
/// denotes. Drawables only ever store `Tag::TopLeft` positions; other tags are accepted on input
/// and produced on output for convenience.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub tag: Tag,
}

impl Position {
    pub const fn new(x: i32, y: i32, tag: Tag) -> Self {
        Position { x, y, tag }
    }

    pub const fn top_left(x: i32, y: i32) -> Self {
        Position::new(x, y, Tag::TopLeft)
    }

    pub const fn origin() -> Self {
        Position::top_left(0, 0)
    }

    /// Convert this position to the top-left corner of a rectangle of size `dim`.
    pub fn to_top_left(self, dim: Dimension) -> Position {
        let (w, h) = (dim.width as i32, dim.height as i32);
        let (x, y) = match self.tag {
            Tag::TopLeft => (self.x, self.y),
            Tag::TopRight => (self.x - (w - 1), self.y),
            Tag::BottomLeft => (self.x, self.y - (h - 1)),
            Tag::BottomRight => (self.x - (w - 1), self.y - (h - 1)),
            Tag::Center => (self.x - w / 2, self.y - h / 2),
        };
        Position::top_left(x, y)
    }

    /// Inverse of `to_top_left`: given a top-left position of a rectangle of size `dim`, compute
    /// the coordinate of the point named by `tag`.
    pub fn from_top_left(self, dim: Dimension, tag: Tag) -> Position {
        debug_assert_eq!(self.tag, Tag::TopLeft);
        let (w, h) = (dim.width as i32, dim.height as i32);
        let (x, y) = match tag {
            Tag::TopLeft => (self.x, self.y),
            Tag::TopRight => (self.x + (w - 1), self.y),
            Tag::BottomLeft => (self.x, self.y + (h - 1)),
            Tag::BottomRight => (self.x + (w - 1), self.y + (h - 1)),
            Tag::Center => (self.x + w / 2, self.y + h / 2),
        };
        Position::new(x, y, tag)
    }
}

/// An unsigned rectangle size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    pub const fn new(width: u32, height: u32) -> Self {
        Dimension { width, height }
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Clip a value between some low and high limit.
pub(crate) fn clip<T: PartialOrd>(lo: T, x: T, hi: T) -> T {
    match () {
        _ if x > hi => hi,
        _ if x < lo => lo,
        _ => x,
    }
}

/// Length of the part of the span `[start, start + len)` that lies inside `[0, limit)`.
///
/// An overhang past the origin shrinks the span by the overhang, an overhang past `limit` clamps
/// it to `limit - start`, and the result is saturated to `[0, limit]`.
pub(crate) fn visible_span(start: i32, len: u32, limit: u32) -> u32 {
    let (start, len, limit) = (start as i64, len as i64, limit as i64);
    let mut visible = len;
    if start < 0 {
        visible += start;
    }
    if start + len > limit {
        visible = visible.min(limit - start);
    }
    clip(0, visible, limit) as u32
}
