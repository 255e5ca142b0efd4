//! Cluster configuration document and its assembly from a wizard state

mod assembler;
mod configuration;

pub use assembler::assemble;
pub use configuration::{
    AddonSpec, AddonValues, ClusterConfiguration, KubernetesSpec, ManagerBinding, OsSpec,
    StorageSpec, ValuesFile,
};
