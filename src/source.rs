use crate::error::Result;

/// A boxed pass over a stream. Each element is one item occurrence.
pub type ItemStream<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

/// A stream that can be replayed any number of times.
///
/// Every call to [`ItemSource::items`] starts a fresh pass that yields the same
/// sequence as every other pass. Sources are shared across worker threads, so
/// they must be `Sync`.
pub trait ItemSource: Sync {
    fn items(&self) -> Result<ItemStream<'_>>;
}

impl<T: AsRef<str> + Sync> ItemSource for [T] {
    fn items(&self) -> Result<ItemStream<'_>> {
        Ok(Box::new(self.iter().map(|item| Ok(item.as_ref().to_owned()))))
    }
}

impl<T: AsRef<str> + Sync> ItemSource for Vec<T> {
    fn items(&self) -> Result<ItemStream<'_>> {
        self.as_slice().items()
    }
}
