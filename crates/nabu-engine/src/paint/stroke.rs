/// Endpoint decoration for open strokes.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Corner decoration where two stroked segments meet.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// On/off lengths for dashed strokes, plus the phase offset into the cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DashPattern {
    pub lengths: Vec<f32>,
    pub offset: f32,
}

impl DashPattern {
    #[inline]
    pub fn new(lengths: Vec<f32>, offset: f32) -> Self {
        Self { lengths, offset }
    }
}

/// Stroke geometry state.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
    pub dash: Option<DashPattern>,
}

impl Stroke {
    #[inline]
    pub fn new(width: f32) -> Self {
        Self { width, ..Self::default() }
    }

    #[inline]
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    #[inline]
    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    #[inline]
    pub fn with_dash(mut self, dash: DashPattern) -> Self {
        self.dash = Some(dash);
        self
    }
}

impl Default for Stroke {
    #[inline]
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 10.0,
            dash: None,
        }
    }
}
