/*!
Checked and unchecked access helpers.

The parser only produces offsets that are in bounds for the buffers they
index, and the navigation API relies on that. Debug builds route every such
access through the checked variant so a bad offset fails loudly; release
builds skip the bounds checks.
*/

macro_rules! get_unchecked {
    ($slice:expr, $index:expr) => {{
        #[cfg(debug_assertions)]
        {
            ($slice)
                .get($index)
                .expect("attempt to index out of bounds")
        }

        #[cfg(not(debug_assertions))]
        {
            // SAFETY: the index must always be in bounds
            #[allow(unused_unsafe)]
            unsafe {
                ($slice).get_unchecked($index)
            }
        }
    }};
}

macro_rules! get_unchecked_mut {
    ($slice:expr, $index:expr) => {{
        #[cfg(debug_assertions)]
        {
            ($slice)
                .get_mut($index)
                .expect("attempt to index out of bounds")
        }

        #[cfg(not(debug_assertions))]
        {
            // SAFETY: the index must always be in bounds
            #[allow(unused_unsafe)]
            unsafe {
                ($slice).get_unchecked_mut($index)
            }
        }
    }};
}

macro_rules! from_utf8_unchecked {
    ($bytes:expr) => {{
        #[cfg(debug_assertions)]
        {
            std::str::from_utf8($bytes).expect("invalid utf8")
        }

        #[cfg(not(debug_assertions))]
        {
            // SAFETY: string content is validated during the parse
            #[allow(unused_unsafe)]
            unsafe {
                std::str::from_utf8_unchecked($bytes)
            }
        }
    }};
}
