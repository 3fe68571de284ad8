// Schedule resolution engine
// Resolver drives the cache, falls back to the generator, and hands the
// result to the sorter

pub mod assembler;
pub mod generator;
pub mod resolver;
pub mod sorter;
pub mod window;

pub use assembler::{generate_for_group, AssembledSchedule, ScheduleAssembler, ScheduleSource};
pub use generator::{generate, sessions_per_week};
pub use resolver::{AssignmentResolver, Strategy};
pub use sorter::sort;
pub use window::SchedulingWindow;
