//! Forwarding macros that implement safe fd manipulation in terms of a field's implementations.

macro_rules! forward_as_fd {
    ($ty:ty) => {
        impl ::std::os::fd::AsFd for $ty {
            #[inline]
            fn as_fd(&self) -> ::std::os::fd::BorrowedFd<'_> {
                ::std::os::fd::AsFd::as_fd(&self.0)
            }
        }
        impl ::std::os::fd::AsRawFd for $ty {
            #[inline]
            fn as_raw_fd(&self) -> ::std::os::fd::RawFd {
                ::std::os::fd::AsRawFd::as_raw_fd(&::std::os::fd::AsFd::as_fd(self))
            }
        }
    };
}

macro_rules! forward_into_fd {
    ($ty:ty) => {
        impl ::std::convert::From<$ty> for ::std::os::fd::OwnedFd {
            #[inline]
            fn from(x: $ty) -> Self {
                ::std::convert::From::from(x.0)
            }
        }
    };
}

macro_rules! forward_from_fd {
    ($ty:ty) => {
        impl ::std::convert::From<::std::os::fd::OwnedFd> for $ty {
            #[inline]
            fn from(x: ::std::os::fd::OwnedFd) -> Self {
                Self(::std::convert::From::from(x))
            }
        }
    };
}

macro_rules! forward_fd {
    ($ty:ty) => {
        forward_as_fd!($ty);
        forward_into_fd!($ty);
        forward_from_fd!($ty);
    };
}
