#[macro_use]
mod common;

#[cfg(test)]
mod function {
    tests! {
        print_function in function is OK
        "<fn f>"
    }

    tests! {
        parameters in function is OK
        "3"
    }

    tests! {
        recursion in function is OK
        "55"
    }

    tests! {
        no_return_yields_nil in function is OK
        "nil"
    }

    tests! {
        local_function in function is OK
        "local"
    }
}
