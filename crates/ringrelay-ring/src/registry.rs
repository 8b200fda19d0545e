//! Ring registry: coordinator-owned membership state.
//!
//! The registry is an append-only sequence of [`NodeRecord`]s. The successor
//! handed to a new registrant is always the record that was tail at the
//! moment of the join, so successor edges telescope back to the
//! coordinator's own self-record and the registry always describes a closed
//! ring. Traversal order from the coordinator is therefore the reverse of
//! registration order; that rule is deliberate and load-bearing, not an
//! accident to fix.

use parking_lot::Mutex;
use ringrelay_core::{MembershipId, NodeAddr, NodeRecord, RegistrationGrant};
use ringrelay_hash::Salt;
use tracing::{debug, info};

/// Ordered ring membership, owned by the coordinator node.
pub struct RingRegistry {
    own_addr: NodeAddr,
    // all tail reads and appends happen under this lock; concurrent
    // registrations racing on "current tail" would corrupt ring order
    records: Mutex<Vec<NodeRecord>>,
}

impl RingRegistry {
    /// Create an empty registry for the node at `own_addr`.
    pub fn new(own_addr: NodeAddr) -> Self {
        Self {
            own_addr,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Register the node at `host:port` as a new ring member.
    ///
    /// The registrant is told to forward to whatever node was tail before it
    /// joined (the coordinator itself for the very first registrant). The
    /// salt stored in the registry record and the salt handed back in the
    /// grant are minted independently.
    pub fn register(&self, host: &str, port: u16) -> RegistrationGrant {
        let mut records = self.records.lock();

        let successor = match records.last() {
            Some(tail) => tail.addr.clone(),
            None => {
                // first contact: the coordinator becomes the ring's first
                // member and its own tail
                let me = self.self_record();
                let addr = me.addr.clone();
                records.push(me);
                addr
            }
        };

        let registrant = NodeAddr::new(host, port);
        let membership_id = MembershipId::new();
        records.push(NodeRecord {
            addr: registrant.clone(),
            membership_id: membership_id.clone(),
            assigned_salt: Salt::generate(),
        });

        info!(
            %registrant,
            %successor,
            members = records.len(),
            "registered ring member"
        );

        RegistrationGrant {
            successor,
            membership_id,
            assigned_salt: Salt::generate(),
        }
    }

    /// Current tail of the ring, appending the coordinator's self-record
    /// first if the registry is still empty.
    ///
    /// This is the first hop of every originated message.
    pub fn bootstrap_tail(&self) -> NodeAddr {
        let mut records = self.records.lock();
        match records.last() {
            Some(tail) => tail.addr.clone(),
            None => {
                debug!(addr = %self.own_addr, "bootstrapping registry with self-record");
                let me = self.self_record();
                let addr = me.addr.clone();
                records.push(me);
                addr
            }
        }
    }

    /// Number of records, the coordinator's self-record included.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether no node has registered and nothing has been originated yet.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Snapshot of the current records.
    pub fn records(&self) -> Vec<NodeRecord> {
        self.records.lock().clone()
    }

    fn self_record(&self) -> NodeRecord {
        NodeRecord {
            addr: self.own_addr.clone(),
            membership_id: MembershipId::new(),
            assigned_salt: Salt::generate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn coordinator_addr() -> NodeAddr {
        NodeAddr::new("127.0.0.1", 8080)
    }

    #[test]
    fn test_first_registrant_points_at_coordinator() {
        let registry = RingRegistry::new(coordinator_addr());
        let grant = registry.register("10.0.0.1", 9001);

        assert_eq!(grant.successor, coordinator_addr());
        // self-record plus the registrant
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_successor_is_previous_tail() {
        let registry = RingRegistry::new(coordinator_addr());
        registry.register("10.0.0.1", 9001);
        let grant2 = registry.register("10.0.0.2", 9002);
        let grant3 = registry.register("10.0.0.3", 9003);

        assert_eq!(grant2.successor, NodeAddr::new("10.0.0.1", 9001));
        assert_eq!(grant3.successor, NodeAddr::new("10.0.0.2", 9002));
    }

    #[test]
    fn test_ring_closure() {
        // walking successor edges from the coordinator N+1 times after N
        // registrations returns to the coordinator
        let registry = RingRegistry::new(coordinator_addr());
        let mut successors: HashMap<NodeAddr, NodeAddr> = HashMap::new();

        for i in 0..5u16 {
            let host = format!("10.0.0.{}", i + 1);
            let grant = registry.register(&host, 9000 + i);
            successors.insert(NodeAddr::new(host, 9000 + i), grant.successor);
        }

        // the coordinator's first hop is the current tail
        let mut current = registry.bootstrap_tail();
        let mut hops = 1;
        while current != coordinator_addr() {
            current = successors
                .get(&current)
                .expect("walk left the registered set")
                .clone();
            hops += 1;
        }
        assert_eq!(hops, 6);
    }

    #[test]
    fn test_bootstrap_tail_on_empty_registry() {
        let registry = RingRegistry::new(coordinator_addr());
        assert!(registry.is_empty());

        // with no peers the coordinator forwards to itself
        assert_eq!(registry.bootstrap_tail(), coordinator_addr());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_membership_ids_and_salts_are_fresh() {
        let registry = RingRegistry::new(coordinator_addr());
        let g1 = registry.register("10.0.0.1", 9001);
        let g2 = registry.register("10.0.0.2", 9002);

        assert_ne!(g1.membership_id, g2.membership_id);

        // the stored salt and the granted salt are independent mints
        let records = registry.records();
        let stored = &records.last().unwrap().assigned_salt;
        assert_ne!(stored, &g2.assigned_salt);
    }

    #[test]
    fn test_registry_only_grows() {
        let registry = RingRegistry::new(coordinator_addr());
        let before = registry.register("10.0.0.1", 9001);
        let records_before = registry.records();

        registry.register("10.0.0.2", 9002);
        let records_after = registry.records();

        // earlier records are byte-for-byte untouched
        assert_eq!(records_after.len(), records_before.len() + 1);
        for (a, b) in records_before.iter().zip(records_after.iter()) {
            assert_eq!(a.membership_id, b.membership_id);
            assert_eq!(a.addr, b.addr);
        }
        assert_eq!(before.successor, coordinator_addr());
    }
}
