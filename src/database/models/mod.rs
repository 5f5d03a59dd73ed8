pub mod config;
pub mod dashboard;
pub mod layout;
pub mod mapping;
pub mod organization;
pub mod protoboard;
pub mod server;
pub mod source;
pub mod template;
pub mod user;

pub use config::{AuthConfig, Config, CONFIG_ID};
pub use dashboard::Dashboard;
pub use layout::Layout;
pub use mapping::{Mapping, MAPPING_WILDCARD};
pub use organization::{Organization, DEFAULT_ORGANIZATION_ID, DEFAULT_ORGANIZATION_NAME};
pub use protoboard::{Protoboard, ProtoboardMeta};
pub use server::Server;
pub use source::Source;
pub use template::ConfigTemplate;
pub use user::{Role, RoleName, UnknownRole, User, OAUTH2_SCHEME};
