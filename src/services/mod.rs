pub mod attendance_service;
pub mod attendance_service_impl;
pub mod shift_service;
pub mod shift_service_impl;
pub mod stats_service;
pub mod stats_service_impl;
pub mod transaction_service;
pub mod transaction_service_impl;

pub use attendance_service::{AttendanceError, AttendanceService, LoginBlock};
pub use attendance_service_impl::SeaOrmAttendanceService;
pub use shift_service::{ClockInOutcome, ShiftError, ShiftService};
pub use shift_service_impl::SeaOrmShiftService;
pub use stats_service::{DailyStats, LeaderboardEntry, StatsError, StatsService};
pub use stats_service_impl::SeaOrmStatsService;
pub use transaction_service::{TransactionError, TransactionService};
pub use transaction_service_impl::SeaOrmTransactionService;

pub mod scheduler;
pub use scheduler::Scheduler;
