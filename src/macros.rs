/// Build a `Default` value with a handful of fields overridden
#[macro_export]
macro_rules! new_t {
    ($t:ty, $($k:ident = $v:expr),+ $(,)?) => {{
        let mut c = <$t>::default();
        $(c.$k = $v;)+
        c
    }};
}

#[macro_export]
macro_rules! assert_f64_approx {
    ($l:expr, $r:expr) => {
        $crate::assert_f64_approx!($l, $r, tol = f64::EPSILON)
    };
    ($l:expr, $r:expr, tol = $tol:expr) => {{
        let (l, r): (f64, f64) = ($l, $r);
        assert!((l - r).abs() < $tol, "assertion failed: {} !~ {} (± {})", l, r, $tol)
    }};
}

#[macro_export]
macro_rules! assert_vec_approx {
    ($l:expr, $r:expr) => {{
        let (l, r): ($crate::Vector2, $crate::Vector2) = ($l, $r);
        assert!(
            l.distance(&r) < 1e-9,
            "assertion failed: ({}, {}) !~ ({}, {})",
            l.x,
            l.y,
            r.x,
            r.y
        )
    }};
}
