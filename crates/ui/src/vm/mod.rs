mod completion_vm;
mod question_vm;
mod test_vm;
mod time_fmt;

pub use completion_vm::CompletionVm;
pub use question_vm::QuestionCardVm;
pub use test_vm::{KeyCommand, TestSessionVm};
pub use time_fmt::{format_elapsed, timer_class};
