/*!
The arena allocation contract.

The parser makes exactly one reservation per parse attempt, sized to one
machine word per input byte, and releases it exactly once: either when the
document is dropped, or before an error returns. Keeping the contract this
small lets test allocators count reservations and releases and confirm they
balance.
*/

/**
A source of arena blocks for the parser.

Implementations may refuse a reservation by returning `None`, which surfaces
as an out-of-memory parse error.
*/
pub trait Allocator {
    /**
    Reserve a zeroed block of `words` machine words.
    */
    fn allocate(&self, words: usize) -> Option<Vec<usize>>;

    /**
    Release a block previously returned by [`allocate`](Allocator::allocate).
    */
    fn deallocate(&self, block: Vec<usize>);
}

/**
The default heap-backed allocator.
*/
#[derive(Debug, Default, Clone, Copy)]
pub struct Heap;

impl Allocator for Heap {
    fn allocate(&self, words: usize) -> Option<Vec<usize>> {
        let mut block = Vec::new();
        block.try_reserve_exact(words).ok()?;
        block.resize(words, 0);

        Some(block)
    }

    fn deallocate(&self, block: Vec<usize>) {
        drop(block);
    }
}

impl<'a, A: Allocator + ?Sized> Allocator for &'a A {
    fn allocate(&self, words: usize) -> Option<Vec<usize>> {
        (**self).allocate(words)
    }

    fn deallocate(&self, block: Vec<usize>) {
        (**self).deallocate(block)
    }
}
