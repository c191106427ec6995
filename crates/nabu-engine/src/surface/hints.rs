/// Rendering-quality hint keys.
///
/// Hints are advisory. A surface that does not understand a key stores or
/// ignores it; hints never fail a drawing call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum HintKey {
    Antialiasing,
    TextAntialiasing,
    Interpolation,
    StrokeControl,
}

/// Hint values. Which values make sense depends on the key; surfaces
/// tolerate mismatched pairs by ignoring them.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HintValue {
    Default,
    On,
    Off,
    Nearest,
    Bilinear,
    Bicubic,
}
