//! Fabrik Fleet - Pure fleet-operation utilities
//!
//! Everything here is synchronous and free of I/O:
//!
//! - **identity**: deployment and task name codec
//! - **schedule**: randomized cron schedules for per-instance jobs
//! - **platform**: platform resolution and platform managers
//! - **manifest**: broker-agent credential lookup in manifests
//! - **operation**: detection of broker-internal operations

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod identity;
pub mod manifest;
pub mod operation;
pub mod platform;
pub mod schedule;

pub use error::{FleetError, Result};
pub use identity::{
    decode_deployment_name, decode_task_id, deployment_name_regex, deployment_name_regex_for,
    encode_deployment_name, encode_task_id, task_id_regex, DeploymentNameCodec,
};
pub use manifest::{broker_agent_creds_from_manifest, parse_manifest, BROKER_AGENT_JOB};
pub use operation::{is_broker_operation, BROKER_OPERATION_PARAMETER};
pub use platform::{platform_from_context, platform_manager, PlatformManager};
pub use schedule::{
    CronSchedule, FixedRandom, IntervalDescriptor, RandomSource, ScheduleGenerator, ThreadRandom,
    WeeklyConstraints,
};
