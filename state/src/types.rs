// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identity newtypes for switch-state entities.

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident($repr:ty)) => {
        $(#[$doc])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            /// The raw numeric value of the id.
            #[must_use]
            pub fn raw(self) -> $repr {
                self.0
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a physical switch port.
    PortId(u32)
);
entity_id!(
    /// Identifier of a layer-2 VLAN.
    VlanId(u16)
);
entity_id!(
    /// Identifier of a routed interface.
    InterfaceId(u32)
);
entity_id!(
    /// Identifier of a virtual router (VRF).
    RouterId(u32)
);
entity_id!(
    /// Identifier of an aggregate (LAG) port.
    AggregatePortId(u16)
);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_order_by_raw_value_and_display_plainly() {
        assert!(PortId(1) < PortId(2));
        assert_eq!(VlanId(4094).to_string(), "4094");
        assert_eq!(InterfaceId::from(100).raw(), 100);
    }
}
