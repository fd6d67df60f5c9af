//! Exam seat assignment for the U-Engine ecosystem.
//!
//! Assigns exam candidates to seats across one or more rooms so that
//! candidates of the same course sit apart, and detects exams that
//! double-book candidates.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Candidate`, `Room`, `Exam`, `Session`,
//!   `Seat`, `Assignment`
//! - **`validation`**: Input integrity checks (duplicate IDs, seat bounds,
//!   seat collisions, eligibility)
//! - **`allocation`**: Capacity distribution, candidate sequencing,
//!   grid placement, and the spacing retry loop
//! - **`conflict`**: Time/session/branch overlap and shared-candidate checks
//! - **`store`**: Data-access contract and an in-memory implementation
//! - **`service`**: Seating operations over a store
//! - **`report`**: Result shapes for the request boundary
//! - **`error`**: `SeatingError`
//!
//! # Architecture
//!
//! Allocation and conflict detection are pure functions over loaded
//! entities; only [`service::SeatingService`] talks to a store, and every
//! write it makes replaces an exam's assignment set in one atomic call.
//! Logging goes through `tracing`; installing a subscriber is up to the
//! host.
//!
//! # Example
//!
//! ```
//! use u_seating::allocation::AllocatorConfig;
//! use u_seating::models::{Candidate, Exam, Room, Session};
//! use u_seating::service::SeatingService;
//! use u_seating::store::InMemoryStore;
//!
//! let exam = Exam::new(
//!     "E1",
//!     "CS301",
//!     Exam::parse_start("2024-05-02 09:00").unwrap(),
//!     180,
//!     Session::Morning,
//! )
//! .with_branch_list("CSE, ECE");
//!
//! let store = InMemoryStore::new()
//!     .with_candidates(vec![Candidate::new("C1", "CSE"), Candidate::new("C2", "ECE")])
//!     .with_room(Room::new("R1", 4, 5))
//!     .with_exam(exam);
//!
//! let mut service = SeatingService::new(store, AllocatorConfig::new().with_seed(7));
//! let report = service.generate_seating("E1").unwrap();
//! assert_eq!(report.placed, 2);
//! assert_eq!(service.seating_plan("E1").unwrap().seated(), 2);
//! ```

pub mod allocation;
pub mod conflict;
pub mod error;
pub mod models;
pub mod report;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{Result, SeatingError};
