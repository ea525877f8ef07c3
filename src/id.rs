//! Request id generation.
use rand::Rng;

/// Hands out ids for outgoing request packets.
pub trait IdSource: Send {
    fn next_id(&mut self) -> i32;
}

/// Uniformly random ids in `1..=1000`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl RandomIds {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 1000;
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> i32 {
        rand::rng().random_range(Self::MIN..=Self::MAX)
    }
}

/// Always the same id.
#[derive(Debug, Clone, Copy)]
pub struct FixedId(pub i32);

impl IdSource for FixedId {
    fn next_id(&mut self) -> i32 {
        self.0
    }
}

impl<F> IdSource for F
where
    F: FnMut() -> i32 + Send,
{
    fn next_id(&mut self) -> i32 {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_stay_in_range() {
        let mut ids = RandomIds;
        for _ in 0..5000 {
            let id = ids.next_id();
            assert!((RandomIds::MIN..=RandomIds::MAX).contains(&id));
        }
    }

    #[test]
    fn closures_are_id_sources() {
        let mut counter = 0;
        let mut source = move || {
            counter += 1;
            counter
        };
        assert_eq!(source.next_id(), 1);
        assert_eq!(source.next_id(), 2);
        assert_eq!(FixedId(5).next_id(), 5);
    }
}
