//! Controller registry - every active performer in this process

use std::collections::BTreeMap;

use emotesync_core::{ControllerId, ControllerRef, EmoteError, EmoteId, EmoteResult, PeerId};

/// What drives a controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    /// A peer's avatar
    Player,
    /// Host-driven performer with no owning peer
    Puppet,
}

/// An active performance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Performance {
    pub emote: EmoteId,
    /// Which sync-group member is displayed
    pub variant: Option<i16>,
    pub suppress_audio: bool,
}

/// Protocol-visible controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Performing {
        emote: EmoteId,
        variant: Option<i16>,
    },
    Mirroring {
        target: ControllerId,
        emote: EmoteId,
        variant: Option<i16>,
    },
}

/// Live state of a single performer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Controller {
    pub id: ControllerId,
    pub owner: Option<PeerId>,
    pub kind: ControllerKind,
    performance: Option<Performance>,
    sync_target: Option<ControllerId>,
}

impl Controller {
    pub fn new(id: ControllerId, owner: Option<PeerId>, kind: ControllerKind) -> Self {
        Controller {
            id,
            owner,
            kind,
            performance: None,
            sync_target: None,
        }
    }

    pub fn performance(&self) -> Option<&Performance> {
        self.performance.as_ref()
    }

    pub fn performing_emote(&self) -> Option<EmoteId> {
        self.performance.map(|p| p.emote)
    }

    pub fn override_variant(&self) -> Option<i16> {
        self.performance.and_then(|p| p.variant)
    }

    pub fn sync_target(&self) -> Option<ControllerId> {
        self.sync_target
    }

    #[inline]
    pub fn is_performing(&self) -> bool {
        self.performance.is_some()
    }

    pub fn state(&self) -> ControllerState {
        match (self.performance, self.sync_target) {
            (None, _) => ControllerState::Idle,
            (Some(p), None) => ControllerState::Performing {
                emote: p.emote,
                variant: p.variant,
            },
            (Some(p), Some(target)) => ControllerState::Mirroring {
                target,
                emote: p.emote,
                variant: p.variant,
            },
        }
    }

    /// Start performing; leaves any mirror
    pub fn perform(&mut self, emote: EmoteId, variant: Option<i16>, suppress_audio: bool) {
        self.performance = Some(Performance {
            emote,
            variant,
            suppress_audio,
        });
        self.sync_target = None;
    }

    /// Mirror another controller's performance
    pub fn mirror(&mut self, target: ControllerId, performance: Performance) {
        self.performance = Some(performance);
        self.sync_target = Some(target);
    }

    /// Stop mirroring but keep the copied performance
    pub fn detach(&mut self) {
        self.sync_target = None;
    }

    /// Return to idle
    pub fn stop(&mut self) {
        self.performance = None;
        self.sync_target = None;
    }
}

/// Controller registry
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: BTreeMap<ControllerId, Controller>,
    /// The controller driven by this process's local input
    local: Option<ControllerId>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        ControllerRegistry::default()
    }

    /// Lowest id not currently registered
    fn next_free_id(&self) -> Option<ControllerId> {
        let mut candidate: u32 = 0;
        for id in self.controllers.keys() {
            if u32::from(id.0) != candidate {
                break;
            }
            candidate += 1;
        }
        u16::try_from(candidate).ok().map(ControllerId)
    }

    /// Register a controller under the lowest free id
    pub fn register(&mut self, owner: Option<PeerId>, kind: ControllerKind) -> EmoteResult<ControllerId> {
        let id = self.next_free_id().ok_or(EmoteError::RegistryFull)?;
        self.controllers.insert(id, Controller::new(id, owner, kind));
        Ok(id)
    }

    /// Register a controller under an id chosen by the spawning authority
    pub fn insert(&mut self, id: ControllerId, owner: Option<PeerId>, kind: ControllerKind) -> EmoteResult<()> {
        if self.controllers.contains_key(&id) {
            return Err(EmoteError::DuplicateController(id));
        }
        self.controllers.insert(id, Controller::new(id, owner, kind));
        Ok(())
    }

    /// Remove a controller. Anything mirroring it keeps performing on its own.
    pub fn unregister(&mut self, id: ControllerId) -> Option<Controller> {
        if self.local == Some(id) {
            self.local = None;
        }
        let removed = self.controllers.remove(&id)?;
        for mirror in self.controllers.values_mut().filter(|c| c.sync_target == Some(id)) {
            mirror.detach();
        }
        Some(removed)
    }

    pub fn find(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.get(&id)
    }

    pub fn find_mut(&mut self, id: ControllerId) -> Option<&mut Controller> {
        self.controllers.get_mut(&id)
    }

    /// Resolve a peer to its player controller
    pub fn find_by_peer(&self, peer: PeerId) -> Option<ControllerId> {
        self.controllers
            .values()
            .find(|c| c.kind == ControllerKind::Player && c.owner == Some(peer))
            .map(|c| c.id)
    }

    pub fn local(&self) -> Option<ControllerId> {
        self.local
    }

    #[inline]
    pub fn is_local(&self, id: ControllerId) -> bool {
        self.local == Some(id)
    }

    pub fn set_local(&mut self, id: ControllerId) -> EmoteResult<()> {
        if !self.controllers.contains_key(&id) {
            return Err(EmoteError::UnresolvedController(ControllerRef::Id(id)));
        }
        self.local = Some(id);
        Ok(())
    }

    /// Drop every controller (full session reset)
    pub fn clear(&mut self) {
        self.controllers.clear();
        self.local = None;
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Controller> {
        self.controllers.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_lowest_free_id() {
        let mut registry = ControllerRegistry::new();
        let a = registry.register(Some(PeerId(1)), ControllerKind::Player).unwrap();
        let b = registry.register(Some(PeerId(2)), ControllerKind::Player).unwrap();
        let c = registry.register(None, ControllerKind::Puppet).unwrap();
        assert_eq!((a, b, c), (ControllerId(0), ControllerId(1), ControllerId(2)));

        registry.unregister(b);
        let reused = registry.register(Some(PeerId(3)), ControllerKind::Player).unwrap();
        assert_eq!(reused, ControllerId(1));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut registry = ControllerRegistry::new();
        registry.insert(ControllerId(7), None, ControllerKind::Puppet).unwrap();
        let result = registry.insert(ControllerId(7), Some(PeerId(1)), ControllerKind::Player);
        assert_eq!(result, Err(EmoteError::DuplicateController(ControllerId(7))));
        assert_eq!(registry.register(None, ControllerKind::Puppet).unwrap(), ControllerId(0));
    }

    #[test]
    fn test_registry_full() {
        let mut registry = ControllerRegistry::new();
        for raw in 0..=u16::MAX {
            registry.insert(ControllerId(raw), None, ControllerKind::Puppet).unwrap();
        }
        assert_eq!(registry.register(None, ControllerKind::Puppet), Err(EmoteError::RegistryFull));
    }

    #[test]
    fn test_find_by_peer_ignores_puppets() {
        let mut registry = ControllerRegistry::new();
        registry.insert(ControllerId(0), Some(PeerId(4)), ControllerKind::Puppet).unwrap();
        registry.insert(ControllerId(1), Some(PeerId(4)), ControllerKind::Player).unwrap();
        assert_eq!(registry.find_by_peer(PeerId(4)), Some(ControllerId(1)));
        assert_eq!(registry.find_by_peer(PeerId(5)), None);
    }

    #[test]
    fn test_local_cleared_on_unregister() {
        let mut registry = ControllerRegistry::new();
        let id = registry.register(Some(PeerId(1)), ControllerKind::Player).unwrap();
        registry.set_local(id).unwrap();
        assert!(registry.is_local(id));
        registry.unregister(id);
        assert_eq!(registry.local(), None);
        assert!(registry.set_local(id).is_err());
    }

    #[test]
    fn test_unregister_detaches_mirrors() {
        let mut registry = ControllerRegistry::new();
        let target = registry.register(Some(PeerId(1)), ControllerKind::Player).unwrap();
        let mirror = registry.register(Some(PeerId(2)), ControllerKind::Player).unwrap();
        let bystander = registry.register(None, ControllerKind::Puppet).unwrap();
        let copied = Performance {
            emote: EmoteId(2),
            variant: Some(1),
            suppress_audio: false,
        };
        registry.find_mut(target).unwrap().perform(EmoteId(2), Some(0), false);
        registry.find_mut(mirror).unwrap().mirror(target, copied);
        registry.find_mut(bystander).unwrap().mirror(mirror, copied);

        registry.unregister(target);
        assert_eq!(
            registry.find(mirror).unwrap().state(),
            ControllerState::Performing {
                emote: EmoteId(2),
                variant: Some(1)
            }
        );
        assert_eq!(registry.find(bystander).unwrap().sync_target(), Some(mirror));
        assert!(registry.unregister(target).is_none());
    }

    #[test]
    fn test_controller_state_transitions() {
        let mut c = Controller::new(ControllerId(0), None, ControllerKind::Puppet);
        assert_eq!(c.state(), ControllerState::Idle);
        assert_eq!(c.override_variant(), None);

        c.perform(EmoteId(3), Some(1), false);
        assert_eq!(
            c.state(),
            ControllerState::Performing {
                emote: EmoteId(3),
                variant: Some(1)
            }
        );

        let borrowed = Performance {
            emote: EmoteId(2),
            variant: None,
            suppress_audio: true,
        };
        c.mirror(ControllerId(5), borrowed);
        assert_eq!(c.sync_target(), Some(ControllerId(5)));
        assert!(matches!(c.state(), ControllerState::Mirroring { target: ControllerId(5), .. }));

        c.perform(EmoteId(0), None, false);
        assert_eq!(c.sync_target(), None);

        c.stop();
        assert_eq!(c.state(), ControllerState::Idle);
        assert_eq!(c.override_variant(), None);
    }

    #[test]
    fn test_clear() {
        let mut registry = ControllerRegistry::new();
        let id = registry.register(Some(PeerId(1)), ControllerKind::Player).unwrap();
        registry.set_local(id).unwrap();
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.local(), None);
    }
}
