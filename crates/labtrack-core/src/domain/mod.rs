//! Domain entities - the core business objects.

mod dashboard;
mod device;
mod experiment;
mod reactor;
mod reading;
mod user;

pub use dashboard::DashboardStats;
pub use device::{Device, DeviceStats, DeviceUpdate, NewDevice};
pub use experiment::{
    AnalyticalTest, Experiment, ExperimentDraft, ExposureConditions, MaterialFeedstock,
};
pub use reactor::{NewReactor, Reactor, ReactorStatus, ReactorUpdate};
pub use reading::{NewReading, Reading, ReadingPayload};
pub use user::{Credentials, NewUser, Role, User, UserUpdate};
