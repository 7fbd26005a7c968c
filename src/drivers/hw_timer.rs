//! Periodic hardware timer using ESP-IDF's esp_timer API.
//!
//! Drives [`on_timer_tick`] at the configured period. On simulation
//! targets a plain thread sleeps between ticks.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR); they
//! only touch atomics.

use crate::error::Error;
use crate::timer::{TimerContext, on_timer_tick};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn timer_tick_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `&'static TimerContext` passed to esp_timer_create.
    let ctx = unsafe { &*(arg as *const TimerContext) };
    on_timer_tick(ctx.shared, &ctx.periods);
}

/// Start the periodic flag timer. The context lives for the program.
#[cfg(target_os = "espidf")]
pub fn start_periodic(ctx: &'static TimerContext, period_ms: u32) -> Result<(), Error> {
    let mut handle: esp_timer_handle_t = core::ptr::null_mut();
    let args = esp_timer_create_args_t {
        callback: Some(timer_tick_cb),
        arg: core::ptr::from_ref(ctx).cast_mut().cast(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: c"flags".as_ptr(),
        skip_unhandled_events: false,
    };
    // SAFETY: args and ctx outlive the timer; the handle is never deleted.
    unsafe {
        let ret = esp_timer_create(&args, &raw mut handle);
        if ret != ESP_OK {
            log::error!("hw_timer: create failed (rc={})", ret);
            return Err(Error::Init("esp_timer_create"));
        }
        let ret = esp_timer_start_periodic(handle, u64::from(period_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: start failed (rc={})", ret);
            return Err(Error::Init("esp_timer_start_periodic"));
        }
    }
    log::info!("hw_timer: flag timer every {} ms", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_periodic(ctx: &'static TimerContext, period_ms: u32) -> Result<(), Error> {
    let period = std::time::Duration::from_millis(u64::from(period_ms));
    std::thread::Builder::new()
        .name("flag-timer".into())
        .spawn(move || {
            loop {
                std::thread::sleep(period);
                on_timer_tick(ctx.shared, &ctx.periods);
            }
        })
        .map_err(|_| Error::Init("timer thread"))?;
    log::info!("hw_timer(sim): flag timer every {} ms", period_ms);
    Ok(())
}
