//! Key extraction for values stored in an ordered tree.

/// A value that carries its own ordering key.
///
/// The tree orders and de-duplicates values solely by this key.
pub trait Keyed {
    type Key: Ord + ?Sized;

    fn key(&self) -> &Self::Key;
}

macro_rules! keyed_by_self {
    ($($t:ty),* $(,)?) => {
        $(
            impl Keyed for $t {
                type Key = $t;

                fn key(&self) -> &Self::Key {
                    self
                }
            }
        )*
    };
}

keyed_by_self!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, String);

impl Keyed for &str {
    type Key = str;

    fn key(&self) -> &Self::Key {
        self
    }
}
