#[macro_use]
mod common;

#[cfg(test)]
mod _while {
    tests! {
        countdown in while is OK
        "3"
        "2"
        "1"
    }

    tests! {
        false_condition_never_runs in while is OK
        "ok"
    }
}
