#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    tests! {
        define_and_read in variable is OK
        "1"
    }

    tests! {
        uninitialized_is_nil in variable is OK
        "nil"
    }

    tests! {
        redefine_global in variable is OK
        "2"
    }

    tests! {
        undefined in variable is ERR 70
        "Undefined variable 'ghost'."
        "[line 1]"
    }

    tests! {
        redeclare_local in variable is ERR 65
        "[line 3] Error at 'a': Already a variable with this name in this scope."
    }

    tests! {
        own_initializer in variable is ERR 65
        "[line 3] Error at 'a': Can't read local variable in its own initializer."
    }
}
