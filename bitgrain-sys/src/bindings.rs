/* Pre-generated from include/bitgrain.h; rebuild with `--features bindgen` to refresh. */

unsafe extern "C" {
    pub fn bitgrain_encode_grayscale(
        image: *const u8,
        width: u32,
        height: u32,
        out_buffer: *mut u8,
        out_capacity: u32,
        out_len: *mut i32,
        quality: u8,
    ) -> ::std::os::raw::c_int;
}
unsafe extern "C" {
    pub fn bitgrain_encode_rgb(
        image: *const u8,
        width: u32,
        height: u32,
        out_buffer: *mut u8,
        out_capacity: u32,
        out_len: *mut i32,
        quality: u8,
    ) -> ::std::os::raw::c_int;
}
unsafe extern "C" {
    pub fn bitgrain_encode_rgba(
        image: *const u8,
        width: u32,
        height: u32,
        out_buffer: *mut u8,
        out_capacity: u32,
        out_len: *mut i32,
        quality: u8,
    ) -> ::std::os::raw::c_int;
}
unsafe extern "C" {
    pub fn bitgrain_encode_rgb_icc(
        image: *const u8,
        width: u32,
        height: u32,
        out_buffer: *mut u8,
        out_capacity: u32,
        out_len: *mut i32,
        quality: u8,
        icc: *const u8,
        icc_len: u32,
    ) -> ::std::os::raw::c_int;
}
unsafe extern "C" {
    pub fn bitgrain_encode_rgba_icc(
        image: *const u8,
        width: u32,
        height: u32,
        out_buffer: *mut u8,
        out_capacity: u32,
        out_len: *mut i32,
        quality: u8,
        icc: *const u8,
        icc_len: u32,
    ) -> ::std::os::raw::c_int;
}
unsafe extern "C" {
    pub fn bitgrain_decode(
        buffer: *const u8,
        size: i32,
        out_pixels: *mut u8,
        out_capacity: u32,
        out_width: *mut u32,
        out_height: *mut u32,
        out_channels: *mut u32,
    ) -> ::std::os::raw::c_int;
}
unsafe extern "C" {
    pub fn bitgrain_decode_grayscale(
        buffer: *const u8,
        size: i32,
        out_pixels: *mut u8,
        out_capacity: u32,
        out_width: *mut u32,
        out_height: *mut u32,
    ) -> ::std::os::raw::c_int;
}
unsafe extern "C" {
    pub fn bitgrain_decode_icc(
        buffer: *const u8,
        size: i32,
        out_pixels: *mut u8,
        out_capacity: u32,
        out_width: *mut u32,
        out_height: *mut u32,
        out_channels: *mut u32,
        out_icc: *mut *mut u8,
        out_icc_len: *mut u32,
    ) -> ::std::os::raw::c_int;
}
unsafe extern "C" {
    pub fn bitgrain_free_icc(icc: *mut u8, icc_len: u32);
}
