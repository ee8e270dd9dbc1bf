/// Two buffers that alternate between being read and written.
///
/// A pass reads [`PingPong::read`], writes [`PingPong::write`] and then calls
/// [`PingPong::swap`], so the next pass sees the completed output.
#[derive(Debug, Clone)]
pub struct PingPong<T> {
    buffers: [T; 2],
    read: usize,
}

impl<T> PingPong<T> {
    pub fn new(first: T, second: T) -> Self {
        Self {
            buffers: [first, second],
            read: 0,
        }
    }

    pub fn read(&self) -> &T {
        &self.buffers[self.read]
    }

    pub fn write(&self) -> &T {
        &self.buffers[1 - self.read]
    }

    pub fn write_mut(&mut self) -> &mut T {
        &mut self.buffers[1 - self.read]
    }

    /// Borrow the read side and the write side at once.
    pub fn split(&mut self) -> (&T, &mut T) {
        let [first, second] = &mut self.buffers;
        if self.read == 0 {
            (first, second)
        } else {
            (second, first)
        }
    }

    pub fn swap(&mut self) {
        self.read = 1 - self.read;
    }

    pub fn read_index(&self) -> usize {
        self.read
    }

    pub fn into_read(self) -> T {
        let [first, second] = self.buffers;
        if self.read == 0 { first } else { second }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn swap_exchanges_roles() {
        let mut buffers = PingPong::new("a", "b");
        assert_eq!((*buffers.read(), *buffers.write()), ("a", "b"));
        buffers.swap();
        assert_eq!((*buffers.read(), *buffers.write()), ("b", "a"));
        assert_eq!(buffers.read_index(), 1);
        buffers.swap();
        assert_eq!(buffers.into_read(), "a");
    }

    #[test]
    fn written_data_is_read_after_swap() {
        let mut buffers = PingPong::new(vec![1, 2], vec![0, 0]);
        let (input, output) = buffers.split();
        output.iter_mut().zip(input).for_each(|(o, i)| *o = i * 10);
        buffers.swap();
        assert_eq!(buffers.read(), &vec![10, 20]);
        buffers.write_mut()[0] = 7;
        assert_eq!(buffers.write(), &vec![7, 2]);
    }
}
