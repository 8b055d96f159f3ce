//! The four JAST-V axes and projections onto them

use serde::{Deserialize, Serialize};
use std::fmt;

/// One axis of the JAST-V space, in canonical order
///
/// By convention of the default mapping table, `J` and `A` carry lexical
/// (text) deviation and `S` and `T` carry acoustic (audio) deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JastvAxis {
    #[serde(alias = "1")]
    J,
    #[serde(alias = "2")]
    A,
    #[serde(alias = "3")]
    S,
    #[serde(alias = "4")]
    T,
}

impl JastvAxis {
    pub const ALL: [JastvAxis; 4] = [JastvAxis::J, JastvAxis::A, JastvAxis::S, JastvAxis::T];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for JastvAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Exactly four bounded, signed axis values
///
/// The neutral projection is all zeros. Serialized as a bare array; axes
/// read back must be finite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 4]", try_from = "[f64; 4]")]
pub struct JastvProjection {
    axes: [f64; 4],
}

impl JastvProjection {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub(crate) fn from_axes(axes: [f64; 4]) -> Self {
        Self { axes }
    }

    pub fn get(&self, axis: JastvAxis) -> f64 {
        self.axes[axis.index()]
    }

    /// Axis values in canonical order
    pub fn as_array(&self) -> [f64; 4] {
        self.axes
    }

    pub fn iter(&self) -> impl Iterator<Item = (JastvAxis, f64)> + '_ {
        JastvAxis::ALL.into_iter().map(move |axis| (axis, self.get(axis)))
    }

    pub fn is_neutral(&self) -> bool {
        self.axes.iter().all(|v| *v == 0.0)
    }
}

impl From<JastvProjection> for [f64; 4] {
    fn from(projection: JastvProjection) -> Self {
        projection.axes
    }
}

impl TryFrom<[f64; 4]> for JastvProjection {
    type Error = String;

    fn try_from(axes: [f64; 4]) -> Result<Self, Self::Error> {
        match JastvAxis::ALL.into_iter().find(|a| !axes[a.index()].is_finite()) {
            Some(axis) => Err(format!("jast-v axis {} is not finite", axis)),
            None => Ok(Self { axes }),
        }
    }
}
