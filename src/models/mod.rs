//! Seating domain models.
//!
//! Provides the entity types exchanged with the persistence layer and
//! produced by allocation.
//!
//! # Entities
//!
//! | Model | Role | Owned by |
//! |-------|------|----------|
//! | Candidate | Student sitting exams | persistence |
//! | Room | rows × columns seat grid with a capacity | persistence |
//! | Exam | Time window, session, eligible branches | persistence |
//! | Assignment | (exam, candidate, room, seat) | allocator |

mod assignment;
mod candidate;
mod exam;
mod room;

pub use assignment::{Assignment, Seat};
pub use candidate::Candidate;
pub use exam::{parse_branches, Exam, Session, TimeWindow};
pub use room::{total_capacity, Room};
