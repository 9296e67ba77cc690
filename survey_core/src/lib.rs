/*!
Aggregation engine for the laboratory software survey.

The functions of this crate take the survey answers, an optional curriculum and
an optional roster of teachers, and compute the views shown by the dashboard and
the PDF report. They never perform I/O and never fail on bad data: a name that
cannot be matched is kept under its raw spelling.

The entry point is [`Session`]. See the [`manual`] for the input formats.
*/

mod model;
mod normalize;

pub mod coverage;
pub mod curriculum;
pub mod ledger;
pub mod manual;
pub mod query;
pub mod roster;
pub mod session;

pub use crate::curriculum::{CourseRef, CourseResolution, CurriculumIndex};
pub use crate::ledger::{SoftwareLedger, UNCLASSIFIED_PERIOD, UNDEFINED_COURSE};
pub use crate::model::*;
pub use crate::normalize::*;
pub use crate::query::{Facets, Remark, Remarks, RowFilter};
pub use crate::session::{Session, Summary};
