macro_rules! forward_sync_read {
    ($ty:ty) => {
        impl ::std::io::Read for $ty {
            #[inline(always)]
            fn read(&mut self, buf: &mut [u8]) -> ::std::io::Result<usize> {
                ::std::io::Read::read(&mut &self.0, buf)
            }
        }
        impl ::std::io::Read for &$ty {
            #[inline(always)]
            fn read(&mut self, buf: &mut [u8]) -> ::std::io::Result<usize> {
                ::std::io::Read::read(&mut &self.0, buf)
            }
        }
    };
}

macro_rules! forward_sync_write {
    ($ty:ty) => {
        impl ::std::io::Write for $ty {
            #[inline(always)]
            fn write(&mut self, buf: &[u8]) -> ::std::io::Result<usize> {
                ::std::io::Write::write(&mut &self.0, buf)
            }
            #[inline(always)]
            fn flush(&mut self) -> ::std::io::Result<()> {
                ::std::io::Write::flush(&mut &self.0)
            }
        }
        impl ::std::io::Write for &$ty {
            #[inline(always)]
            fn write(&mut self, buf: &[u8]) -> ::std::io::Result<usize> {
                ::std::io::Write::write(&mut &self.0, buf)
            }
            #[inline(always)]
            fn flush(&mut self) -> ::std::io::Result<()> {
                ::std::io::Write::flush(&mut &self.0)
            }
        }
    };
}
