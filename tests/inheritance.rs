#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    tests! {
        inherit_method in inheritance is OK
        "hello"
    }

    tests! {
        override_method in inheritance is OK
        "subclass"
    }

    tests! {
        inherited_method_binds_this in inheritance is OK
        "b"
    }

    tests! {
        inherit_from_itself in inheritance is ERR 65
        "[line 1] Error at 'A': A class can't inherit from itself."
    }
}
