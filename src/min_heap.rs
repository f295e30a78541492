use thiserror::Error;

/// Binary min-heap over a 0-indexed vector.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeapErr {
    #[error("extract from an empty heap")]
    HeapUnderflow,
}

impl<T: Ord> MinHeap<T> {
    pub fn build(source: Vec<T>) -> Self {
        let mut heap = MinHeap { elements: source };
        let n = heap.heap_size();
        for i in (0..n / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap_size();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < n && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < n && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        let mut i = self.heap_size() - 1;
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i] >= self.elements[p] {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
        debug_assert!(self.valid_min_heap());
    }

    pub fn extract_min(&mut self) -> Result<T, HeapErr> {
        if self.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let result = self.elements.swap_remove(0);
        if !self.is_empty() {
            self.sift_down(0);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extract_in_order() {
        let mut heap = MinHeap::build(vec![9, 4, 7, 1, 8, 2, 2, 6]);
        assert!(heap.valid_min_heap());
        heap.insert(0);
        heap.insert(5);

        let mut out = Vec::new();
        while let Ok(v) = heap.extract_min() {
            out.push(v);
        }
        assert_eq!(out, vec![0, 1, 2, 2, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_underflow() {
        let mut heap = MinHeap::build(vec![3u32]);
        assert_eq!(heap.extract_min(), Ok(3));
        assert_eq!(heap.extract_min(), Err(HeapErr::HeapUnderflow));
        assert_eq!(heap.heap_size(), 0);
    }
}
