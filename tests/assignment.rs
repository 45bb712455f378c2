#[macro_use]
mod common;

#[cfg(test)]
mod assignment {
    tests! {
        simple in assignment is OK
        "2"
    }

    tests! {
        chained in assignment is OK
        "3"
        "3"
    }

    tests! {
        produces_the_value in assignment is OK
        "5"
    }

    tests! {
        global_from_function in assignment is OK
        "changed"
    }

    tests! {
        invalid_target in assignment is ERR 65
        "[line 1] Error at '=': Invalid assignment target."
    }

    tests! {
        undefined in assignment is ERR 70
        "Undefined variable 'ghost'."
        "[line 1]"
    }
}
