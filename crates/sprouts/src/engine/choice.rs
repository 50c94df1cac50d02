//! Disambiguation capability: the engine asks, the caller answers.
//!
//! Every hook returns `Option`; `None` means "take the default" (lowest common
//! face, first corner of each dot, no partition). A missing partition is only
//! acceptable when nothing is enclosed or the split policy keeps leftovers on
//! the original face.

use serde::{Deserialize, Serialize};

use super::types::TraceView;
use crate::faces::{Corners, DotId, FaceId, Partition};

/// Several faces are shared by both endpoints.
#[derive(Clone, Debug)]
pub struct FaceQuery<'a> {
    pub a: DotId,
    pub b: DotId,
    pub candidates: &'a [FaceId],
}

/// Corner counts of each endpoint on the chosen face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CornerQuery {
    pub face: FaceId,
    pub a: DotId,
    pub b: DotId,
    pub corners_a: usize,
    pub corners_b: usize,
    /// Both endpoints lie on one trace (the move closes a region).
    pub same_trace: bool,
}

/// A region is being closed; `enclosed` are the other traces of `face`.
#[derive(Clone, Debug)]
pub struct SplitQuery {
    pub face: FaceId,
    /// Id the newly bounded region will get.
    pub new_face: FaceId,
    pub a: DotId,
    pub b: DotId,
    pub sprout: DotId,
    pub enclosed: Vec<TraceView>,
}

pub trait Disambiguator {
    fn choose_face(&mut self, _query: &FaceQuery<'_>) -> Option<FaceId> {
        None
    }

    fn choose_corners(&mut self, _query: &CornerQuery) -> Option<Corners> {
        None
    }

    /// Split the enclosed traces between the new and the original face.
    fn assign_enclosed(&mut self, _query: &SplitQuery) -> Option<Partition> {
        None
    }
}

/// Scripted answers, e.g. parsed from a move file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub face: Option<FaceId>,
    #[serde(default)]
    pub corners: Option<Corners>,
    #[serde(default)]
    pub partition: Option<Partition>,
}

impl Choice {
    pub fn partition(partition: Partition) -> Self {
        Self {
            partition: Some(partition),
            ..Self::default()
        }
    }

    pub fn face(face: FaceId) -> Self {
        Self {
            face: Some(face),
            ..Self::default()
        }
    }

    pub fn with_corners(mut self, a: usize, b: usize) -> Self {
        self.corners = Some(Corners { a, b });
        self
    }
}

impl Disambiguator for Choice {
    fn choose_face(&mut self, _query: &FaceQuery<'_>) -> Option<FaceId> {
        self.face
    }

    fn choose_corners(&mut self, _query: &CornerQuery) -> Option<Corners> {
        self.corners
    }

    fn assign_enclosed(&mut self, _query: &SplitQuery) -> Option<Partition> {
        self.partition.clone()
    }
}
