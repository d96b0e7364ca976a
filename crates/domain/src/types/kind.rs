//! Synchronized object kinds and their descriptors

use serde::{Deserialize, Serialize};

use super::descriptor::{FieldDescriptor as F, ObjectTypeDescriptor};
use crate::impl_name_conversions;

/// The remote object types mirrored into the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Datastore,
    HostSystem,
    VirtualMachine,
}

impl_name_conversions!(ObjectKind {
    Datastore => "Datastore",
    HostSystem => "HostSystem",
    VirtualMachine => "VirtualMachine",
});

impl ObjectKind {
    /// Every kind, in the order a full pass synchronizes them
    pub const ALL: [Self; 3] = [Self::Datastore, Self::HostSystem, Self::VirtualMachine];

    pub fn descriptor(self) -> &'static ObjectTypeDescriptor {
        match self {
            Self::Datastore => &DATASTORE,
            Self::HostSystem => &HOST_SYSTEM,
            Self::VirtualMachine => &VIRTUAL_MACHINE,
        }
    }
}

static DATASTORE: ObjectTypeDescriptor = ObjectTypeDescriptor {
    kind: ObjectKind::Datastore,
    table: "datastore",
    fields: &[
        F::text("name", "object_name"),
        F::parent(),
        F::integer("summary.capacity", "capacity"),
        F::integer("summary.freeSpace", "free_space"),
        F::integer("summary.uncommitted", "uncommitted"),
        F::boolean("summary.accessible", "is_accessible"),
        F::boolean("summary.multipleHostAccess", "multiple_host_access"),
        F::text("summary.maintenanceMode", "maintenance_mode"),
        F::text("summary.type", "datastore_type"),
    ],
};

static HOST_SYSTEM: ObjectTypeDescriptor = ObjectTypeDescriptor {
    kind: ObjectKind::HostSystem,
    table: "host_system",
    fields: &[
        F::text("name", "host_name"),
        F::parent(),
        F::text("summary.hardware.vendor", "sysinfo_vendor"),
        F::text("summary.hardware.model", "sysinfo_model"),
        F::text("summary.hardware.uuid", "sysinfo_uuid"),
        F::integer("summary.hardware.cpuMhz", "hardware_cpu_mhz"),
        F::integer("summary.hardware.numCpuCores", "hardware_cpu_cores"),
        F::integer("summary.hardware.memorySize", "hardware_memory_size"),
        F::text("summary.config.product.fullName", "product_full_name"),
        F::text("runtime.powerState", "runtime_power_state"),
        F::boolean("runtime.inMaintenanceMode", "in_maintenance_mode"),
        F::real("summary.quickStats.overallCpuUsage", "quick_stats_cpu_usage"),
    ],
};

static VIRTUAL_MACHINE: ObjectTypeDescriptor = ObjectTypeDescriptor {
    kind: ObjectKind::VirtualMachine,
    table: "virtual_machine",
    fields: &[
        F::text("name", "object_name"),
        F::parent(),
        F::text("config.annotation", "annotation"),
        F::integer("config.hardware.numCPU", "hardware_numcpu"),
        F::integer("config.hardware.memoryMB", "hardware_memorymb"),
        F::boolean("config.template", "template"),
        F::text("config.uuid", "bios_uuid"),
        F::text("config.instanceUuid", "instance_uuid"),
        F::text("config.guestId", "guest_id"),
        F::text("guest.hostName", "guest_host_name"),
        F::text("guest.ipAddress", "guest_ip_address"),
        F::reference("runtime.host", "runtime_host_uuid"),
        F::text("runtime.powerState", "runtime_power_state"),
        F::reference("resourcePool", "resource_pool_uuid"),
    ],
};
