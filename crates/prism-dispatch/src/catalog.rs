//! Entry-point name tables.
//!
//! Each table hands its rows to a callback macro, so the Rust entry
//! points and the C exports are generated from one list. A row names the
//! operand count, the kernel, the lane type and the generated function
//! names.

/// Invoke `$callback! { $($ctx)* rows }` with one row per scalar/array
/// entry point: `<arity> <name> <Kernel> <type>;`.
#[macro_export]
macro_rules! for_each_scalar_op {
    ($callback:ident ! { $($ctx:tt)* }) => {
        $callback! {
            $($ctx)*
            binary addf32 Add f32;
            binary addf64 Add f64;
            binary subf32 Sub f32;
            binary subf64 Sub f64;
            binary mulf32 Mul f32;
            binary mulf64 Mul f64;
            binary divf32 Div f32;
            binary divf64 Div f64;
            unary sqrtf32 Sqrt f32;
            unary sqrtf64 Sqrt f64;
            ternary fmaf32 Fma f32;
            ternary fmaf64 Fma f64;
        }
    };
}

/// Invoke `$callback! { $($ctx)* rows }` with one row per vector entry
/// point: `<arity> <Kernel> <type> <lanes> <static name> <dynamic name>;`.
#[macro_export]
macro_rules! for_each_vector_op {
    ($callback:ident ! { $($ctx:tt)* }) => {
        $callback! {
            $($ctx)*
            binary Add f32 1 addf32x1_static addf32x1_dynamic;
            binary Add f32 2 addf32x2_static addf32x2_dynamic;
            binary Add f32 4 addf32x4_static addf32x4_dynamic;
            binary Add f32 8 addf32x8_static addf32x8_dynamic;
            binary Add f32 16 addf32x16_static addf32x16_dynamic;
            binary Add f64 1 addf64x1_static addf64x1_dynamic;
            binary Add f64 2 addf64x2_static addf64x2_dynamic;
            binary Add f64 4 addf64x4_static addf64x4_dynamic;
            binary Add f64 8 addf64x8_static addf64x8_dynamic;
            binary Add f64 16 addf64x16_static addf64x16_dynamic;
            binary Sub f32 1 subf32x1_static subf32x1_dynamic;
            binary Sub f32 2 subf32x2_static subf32x2_dynamic;
            binary Sub f32 4 subf32x4_static subf32x4_dynamic;
            binary Sub f32 8 subf32x8_static subf32x8_dynamic;
            binary Sub f32 16 subf32x16_static subf32x16_dynamic;
            binary Sub f64 1 subf64x1_static subf64x1_dynamic;
            binary Sub f64 2 subf64x2_static subf64x2_dynamic;
            binary Sub f64 4 subf64x4_static subf64x4_dynamic;
            binary Sub f64 8 subf64x8_static subf64x8_dynamic;
            binary Sub f64 16 subf64x16_static subf64x16_dynamic;
            binary Mul f32 1 mulf32x1_static mulf32x1_dynamic;
            binary Mul f32 2 mulf32x2_static mulf32x2_dynamic;
            binary Mul f32 4 mulf32x4_static mulf32x4_dynamic;
            binary Mul f32 8 mulf32x8_static mulf32x8_dynamic;
            binary Mul f32 16 mulf32x16_static mulf32x16_dynamic;
            binary Mul f64 1 mulf64x1_static mulf64x1_dynamic;
            binary Mul f64 2 mulf64x2_static mulf64x2_dynamic;
            binary Mul f64 4 mulf64x4_static mulf64x4_dynamic;
            binary Mul f64 8 mulf64x8_static mulf64x8_dynamic;
            binary Mul f64 16 mulf64x16_static mulf64x16_dynamic;
            binary Div f32 1 divf32x1_static divf32x1_dynamic;
            binary Div f32 2 divf32x2_static divf32x2_dynamic;
            binary Div f32 4 divf32x4_static divf32x4_dynamic;
            binary Div f32 8 divf32x8_static divf32x8_dynamic;
            binary Div f32 16 divf32x16_static divf32x16_dynamic;
            binary Div f64 1 divf64x1_static divf64x1_dynamic;
            binary Div f64 2 divf64x2_static divf64x2_dynamic;
            binary Div f64 4 divf64x4_static divf64x4_dynamic;
            binary Div f64 8 divf64x8_static divf64x8_dynamic;
            binary Div f64 16 divf64x16_static divf64x16_dynamic;
            unary Sqrt f32 1 sqrtf32x1_static sqrtf32x1_dynamic;
            unary Sqrt f32 2 sqrtf32x2_static sqrtf32x2_dynamic;
            unary Sqrt f32 4 sqrtf32x4_static sqrtf32x4_dynamic;
            unary Sqrt f32 8 sqrtf32x8_static sqrtf32x8_dynamic;
            unary Sqrt f32 16 sqrtf32x16_static sqrtf32x16_dynamic;
            unary Sqrt f64 1 sqrtf64x1_static sqrtf64x1_dynamic;
            unary Sqrt f64 2 sqrtf64x2_static sqrtf64x2_dynamic;
            unary Sqrt f64 4 sqrtf64x4_static sqrtf64x4_dynamic;
            unary Sqrt f64 8 sqrtf64x8_static sqrtf64x8_dynamic;
            unary Sqrt f64 16 sqrtf64x16_static sqrtf64x16_dynamic;
            ternary Fma f32 1 fmaf32x1_static fmaf32x1_dynamic;
            ternary Fma f32 2 fmaf32x2_static fmaf32x2_dynamic;
            ternary Fma f32 4 fmaf32x4_static fmaf32x4_dynamic;
            ternary Fma f32 8 fmaf32x8_static fmaf32x8_dynamic;
            ternary Fma f32 16 fmaf32x16_static fmaf32x16_dynamic;
            ternary Fma f64 1 fmaf64x1_static fmaf64x1_dynamic;
            ternary Fma f64 2 fmaf64x2_static fmaf64x2_dynamic;
            ternary Fma f64 4 fmaf64x4_static fmaf64x4_dynamic;
            ternary Fma f64 8 fmaf64x8_static fmaf64x8_dynamic;
            ternary Fma f64 16 fmaf64x16_static fmaf64x16_dynamic;
        }
    };
}
