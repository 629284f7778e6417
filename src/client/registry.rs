use super::Client;
use std::collections::HashMap;
use x11rb::protocol::xproto::Window;

/// Index of a client slot in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(usize);

impl ClientId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena owning every managed client. List links between clients are stored
/// as `ClientId`s, so removing a client only frees its slot.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    slots: Vec<Option<Client>>,
    free: Vec<usize>,
    by_window: HashMap<Window, ClientId>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, client: Client) -> ClientId {
        let window = client.window;
        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(client);
                ClientId(index)
            }
            None => {
                self.slots.push(Some(client));
                ClientId(self.slots.len() - 1)
            }
        };
        self.by_window.insert(window, id);
        id
    }

    pub fn remove(&mut self, id: ClientId) -> Option<Client> {
        let client = self.slots.get_mut(id.0)?.take()?;
        debug_assert!(
            !client.in_client_list && !client.in_stack_list,
            "client removed while still linked"
        );
        self.by_window.remove(&client.window);
        self.free.push(id.0);
        Some(client)
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn find_by_window(&self, window: Window) -> Option<ClientId> {
        self.by_window.get(&window).copied()
    }

    pub fn len(&self) -> usize {
        self.by_window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_window.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| ClientId(index))
    }
}

impl std::ops::Index<ClientId> for ClientRegistry {
    type Output = Client;

    fn index(&self, id: ClientId) -> &Client {
        match self.get(id) {
            Some(client) => client,
            None => panic!("stale client id {:?}", id),
        }
    }
}

impl std::ops::IndexMut<ClientId> for ClientRegistry {
    fn index_mut(&mut self, id: ClientId) -> &mut Client {
        match self.get_mut(id) {
            Some(client) => client,
            None => panic!("stale client id {:?}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_reused_after_removal() {
        let mut registry = ClientRegistry::new();
        let first = registry.insert(Client::new(10, 0, 1));
        let second = registry.insert(Client::new(20, 0, 1));
        assert_eq!(registry.len(), 2);

        registry.remove(first);
        assert_eq!(registry.find_by_window(10), None);

        let third = registry.insert(Client::new(30, 0, 1));
        assert_eq!(third, first);
        assert_eq!(registry.find_by_window(30), Some(third));
        assert_eq!(registry[second].window, 20);
    }

    #[test]
    fn test_remove_twice_is_none() {
        let mut registry = ClientRegistry::new();
        let id = registry.insert(Client::new(10, 0, 1));
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.is_empty());
    }
}
