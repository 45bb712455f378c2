#[macro_use]
mod common;

#[cfg(test)]
mod _for {
    tests! {
        counter in for is OK
        "0"
        "1"
        "2"
    }

    tests! {
        no_clauses in for is OK
        "looped once"
    }

    tests! {
        expression_initializer in for is OK
        "0"
        "1"
    }

    tests! {
        declared_variable_is_scoped in for is ERR 70
        "Undefined variable 'i'."
        "[line 2]"
    }
}
