//! Static informational content for the VetSupport family companion
//!
//! The informational surfaces of the companion (crisis support,
//! education, support network, communication) render curated content
//! rather than live data. This crate holds that content as typed
//! directories with small accessor functions, so every view can render
//! without owning data of its own.

pub mod crisis;
pub mod education;
pub mod messages;
pub mod network;

pub use crisis::{
    crisis_lines, emergency_line, safety_plan, CrisisLine, CrisisLineKind, SafetyPlanStep,
};
pub use education::{
    beginner_modules, catalog, modules_covering, EducationModule, ModuleKind, ModuleLevel,
};
pub use messages::{
    communication_tips, templates, templates_of, CommunicationTipSheet, MessageTemplate,
    TemplateKind,
};
pub use network::{response_plans, support_groups, ResponsePlan, SupportGroup};
