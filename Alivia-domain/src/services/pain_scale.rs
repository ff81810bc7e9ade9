//! Faces pain scale: nearest face and colour ramp for an intensity value.

use serde::Serialize;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Lowest storable intensity
pub const MIN_INTENSITY: f64 = 1.0;

/// Highest storable intensity
pub const MAX_INTENSITY: f64 = 10.0;

/// One face of the scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PainFace {
    /// Anchor value printed under the face
    pub value: u8,
    pub label: &'static str,
    pub description: &'static str,
    /// Hex colour of the face
    pub color: &'static str,
}

pub const FACES: [PainFace; 6] = [
    PainFace { value: 0, label: "Sin dolor", description: "Sin dolor", color: "#87CEEB" },
    PainFace { value: 2, label: "Dolor leve", description: "Duele un poco", color: "#90EE90" },
    PainFace { value: 4, label: "Dolor moderado", description: "Duele un poco más", color: "#FFD700" },
    PainFace { value: 6, label: "Dolor severo", description: "Duele aún más", color: "#FF8C00" },
    PainFace { value: 8, label: "Dolor muy severo", description: "Duele mucho", color: "#FF6347" },
    PainFace { value: 10, label: "Peor dolor imaginable", description: "Duele lo peor", color: "#DC143C" },
];

/// Colour ramp control points, evenly spaced over the normalized scale
const RAMP: [(f64, f64, f64); 6] = [
    (135.0, 206.0, 235.0),
    (144.0, 238.0, 144.0),
    (255.0, 215.0, 0.0),
    (255.0, 140.0, 0.0),
    (255.0, 99.0, 71.0),
    (220.0, 20.0, 60.0),
];

/// Face and colour for one intensity value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PainScaleReading {
    /// Input after clamping
    pub value: f64,
    pub face: PainFace,
    /// `rgb(r, g, b)`
    pub color: String,
}

/// Clamp to the storable range; non-finite input reads as the minimum
pub fn clamp_intensity(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_INTENSITY, MAX_INTENSITY)
    } else {
        MIN_INTENSITY
    }
}

/// Intensity stored when a face is tapped. The "no pain" face stores the scale minimum.
pub fn face_to_intensity(anchor: u8) -> f64 {
    if anchor == 0 {
        MIN_INTENSITY
    } else {
        clamp_intensity(f64::from(anchor))
    }
}

/// Nearest face to the clamped value; ties go to the lower anchor
pub fn closest_face(value: f64) -> PainFace {
    let value = clamp_intensity(value);
    FACES
        .iter()
        .copied()
        .reduce(|best, face| {
            if (f64::from(face.value) - value).abs() < (f64::from(best.value) - value).abs() {
                face
            } else {
                best
            }
        })
        .unwrap_or(FACES[0])
}

/// Scale colour for a value, rendered as `rgb(r, g, b)`
pub fn scale_color(value: f64) -> String {
    let t = (clamp_intensity(value) - MIN_INTENSITY) / (MAX_INTENSITY - MIN_INTENSITY);

    // Segment upper bounds are inclusive
    let segment = if t <= 0.2 {
        0
    } else if t <= 0.4 {
        1
    } else if t <= 0.6 {
        2
    } else if t <= 0.8 {
        3
    } else {
        4
    };

    let local = (t - 0.2 * segment as f64) / 0.2;
    let (r0, g0, b0) = RAMP[segment];
    let (r1, g1, b1) = RAMP[segment + 1];
    let channel = |from: f64, to: f64| (from + (to - from) * local).round() as u8;

    format!("rgb({}, {}, {})", channel(r0, r1), channel(g0, g1), channel(b0, b1))
}

/// Face and colour for a value
pub fn reading(value: f64) -> PainScaleReading {
    PainScaleReading {
        value: clamp_intensity(value),
        face: closest_face(value),
        color: scale_color(value),
    }
}
