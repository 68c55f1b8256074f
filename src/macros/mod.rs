#![allow(unused_macros)]

macro_rules! multimacro {
    ($ty:ty, $($macro:ident $(($($arg:tt)+))?),+ $(,)?) => {$(
        $macro!($ty $(, $($arg)+)?);
    )+};
}

macro_rules! make_macro_modules {
    ($($modname:ident),+ $(,)?) => {$(
        #[macro_use] mod $modname;
    )+};
}

make_macro_modules! {
    ok_or_ret_errno, forward_iorw, forward_fd, forward_fmt,
}
