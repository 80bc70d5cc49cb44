/// The purpose of this macro is to be able to generate code for each
/// primitive integer type (this means no f32 or f64).
/// You invoke the macro with the path to another macro that you would
/// like to invoke for each type.
/// Optionally you can restrict generation to either unsigned or signed
/// by typing `;unsigned` or `;signed` after the provided macro argument.
#[macro_export]
macro_rules! for_each_int_type {
    ($macro:path) => {
        $crate::for_each_int_type!($macro;unsigned);
        $crate::for_each_int_type!($macro;signed);
    };
    ($macro:path;unsigned) => {
        $macro!{usize}
        $macro!{u128}
        $macro!{u64}
        $macro!{u32}
        $macro!{u16}
        $macro!{u8}
    };
    ($macro:path;signed) => {
        $macro!{isize}
        $macro!{i128}
        $macro!{i64}
        $macro!{i32}
        $macro!{i16}
        $macro!{i8}
    }
}

/// Continue a loop if a condition is met.
/// ```rs
/// let mut index = 0;
/// loop {
/// 	continue_if!((index & 1) == 0);
/// 	println!("{}", index);
/// 	index += 1;
/// 	if index > 10 {
/// 		break;
/// 	}
/// }
/// ```
/// Alternatively, you can also use a loop identifier:
/// 'x: for x in 0..32 {
/// 	'y: for y in 0..32 {
/// 		continue_if!('y: (y & 1) == 1)
/// 		continue_if!('x: y == 10);
/// 	}
/// }
#[macro_export]
macro_rules! continue_if {
    ($($label:lifetime : )? $condition:expr) => {
        if $condition { continue $($label)?; }
    };
}

/// Return from a function if a condition is met.
/// ```rs
/// let mut index = 0;
/// loop {
/// 	println!("{}", index);
/// 	index += 1;
/// 	return_if!(index >= 10);
/// }
/// ```
/// Alternatively, you can also provide an expression to be returned:
/// ```rs
/// // return_if!(condition => expr)
/// fn sample() -> (i32, i32) {
/// 	for x in 0..32 {
/// 		for y in 0..32 {
/// 			return_if!(x + y == 40 => (x, y));
/// 		}
/// 	}
/// 	(0, 0)
/// }
/// ```
#[macro_export]
macro_rules! return_if {
    ($condition:expr $(=> $result:expr)?) => {
        if $condition {
            return $($result)?;
        }
    };
}
