use std::collections::HashMap;
use std::sync::Arc;

/// Deduplicates short repeated strings (element symbols) into `u32` codes.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    codes: HashMap<Arc<str>, u32>,
    symbols: Vec<Arc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code for `text`, allocating one on first sight.
    pub fn intern(&mut self, text: &str) -> u32 {
        if let Some(&code) = self.codes.get(text) {
            return code;
        }
        let code = self.symbols.len() as u32;
        let symbol: Arc<str> = Arc::from(text);
        self.symbols.push(Arc::clone(&symbol));
        self.codes.insert(symbol, code);
        code
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn into_symbols(self) -> Vec<Arc<str>> {
        self.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_symbols_share_a_code() {
        let mut interner = Interner::new();
        let o = interner.intern("O");
        let p = interner.intern("P");
        assert_eq!(interner.intern("O"), o);
        assert_ne!(o, p);
        assert_eq!(interner.len(), 2);
        assert_eq!(&*interner.into_symbols()[p as usize], "P");
    }
}
