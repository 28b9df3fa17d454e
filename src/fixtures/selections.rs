//! Selection Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::catalog::{Department, ExamLevel};
use crate::grades::Grade;

/// A candidate registration in YAML
#[derive(Debug, Deserialize)]
pub struct SelectionsFixture {
    /// Examination level the candidate sits
    pub exam_level: ExamLevel,

    /// Department the candidate registers under
    pub department: Department,

    /// Map of subject name -> target grade
    pub subjects: FxHashMap<String, Grade>,
}
